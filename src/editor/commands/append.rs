use super::super::index::LayerIndex;
use super::freeze::freeze_layers;
use super::NetCommand;
use crate::errors::EditorError;
use crate::net::{Layer, NetParameter};
use std::collections::HashSet;

/// 在网络末尾追加单个层
#[derive(Debug, Clone)]
pub struct AppendLayer {
    pub layer: Layer,
}

impl AppendLayer {
    pub fn new(layer: Layer) -> Self {
        Self { layer }
    }
}

impl NetCommand for AppendLayer {
    fn name(&self) -> &'static str {
        "append_layer"
    }

    fn apply(&self, net: &mut NetParameter, _index: Option<&LayerIndex>) -> Result<(), EditorError> {
        push_layer(net, self.layer.clone())
    }
}

/// 追加单个层：多输出的层只保留第一个输出端口（如Data层的`data`/`label`默认只接`data`）
pub(super) fn push_layer(net: &mut NetParameter, mut layer: Layer) -> Result<(), EditorError> {
    if net.find_layer(&layer.name).is_some() {
        return Err(EditorError::DuplicateLayerName(layer.name));
    }
    layer.top.truncate(1);
    net.layer.push(layer);
    Ok(())
}

/// 把另一个网络的全部层按顺序追加到末尾，可选地随后冻结全部可学习层
#[derive(Debug, Clone)]
pub struct AppendNet {
    pub source: NetParameter,
    pub auto_freeze: bool,
}

impl AppendNet {
    pub fn new(source: NetParameter, auto_freeze: bool) -> Self {
        Self {
            source,
            auto_freeze,
        }
    }
}

impl NetCommand for AppendNet {
    fn name(&self) -> &'static str {
        "append_net"
    }

    fn apply(&self, net: &mut NetParameter, _index: Option<&LayerIndex>) -> Result<(), EditorError> {
        if self.source.is_legacy() {
            return Err(EditorError::LegacyFormat);
        }

        // 先整体检查重名，避免追加到一半才失败
        let mut names: HashSet<&str> = net.layer.iter().map(|l| l.name.as_str()).collect();
        for layer in &self.source.layer {
            if !names.insert(layer.name.as_str()) {
                return Err(EditorError::DuplicateLayerName(layer.name.clone()));
            }
        }

        net.layer.extend(self.source.layer.iter().cloned().map(|mut layer| {
            layer.dedup_tops();
            layer
        }));

        if self.auto_freeze {
            freeze_layers(net);
        }
        Ok(())
    }
}
