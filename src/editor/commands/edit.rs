use super::super::index::LayerIndex;
use super::NetCommand;
use crate::errors::EditorError;
use crate::net::{Layer, NetParameter, ParamSpec};
use tracing::warn;

/// 修改已有层：改名、输出宽度、参数乘子、BatchNorm的`use_global_stats`，各项相互独立
///
/// ```ignore
/// editor.edit_layer(EditLayer::new("fc1000").rename("fc3").num_output(3))?;
/// editor.edit_layer(EditLayer::new("conv1").lr_mult([1.0, 2.0]).decay_mult([1.0, 0.0]))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct EditLayer {
    pub name: String,
    pub new_name: Option<String>,
    pub num_output: Option<u32>,
    pub lr_mult: Option<Vec<f32>>,
    pub decay_mult: Option<Vec<f32>>,
    pub use_global_stats: Option<bool>,
}

impl EditLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn rename(mut self, new_name: impl Into<String>) -> Self {
        self.new_name = Some(new_name.into());
        self
    }

    pub fn num_output(mut self, num_output: u32) -> Self {
        self.num_output = Some(num_output);
        self
    }

    pub fn lr_mult(mut self, lr_mult: impl Into<Vec<f32>>) -> Self {
        self.lr_mult = Some(lr_mult.into());
        self
    }

    pub fn decay_mult(mut self, decay_mult: impl Into<Vec<f32>>) -> Self {
        self.decay_mult = Some(decay_mult.into());
        self
    }

    pub fn use_global_stats(mut self, use_global_stats: bool) -> Self {
        self.use_global_stats = Some(use_global_stats);
        self
    }

    /// 乘子列表的合法性：同时给出时长度必须一致
    fn check_multipliers(&self) -> Result<(), EditorError> {
        if let (Some(lr), Some(decay)) = (&self.lr_mult, &self.decay_mult) {
            if lr.len() != decay.len() {
                return Err(EditorError::InvalidArgument(format!(
                    "lr_mult与decay_mult的长度不一致：{}≠{}",
                    lr.len(),
                    decay.len()
                )));
            }
        }
        Ok(())
    }
}

impl NetCommand for EditLayer {
    fn name(&self) -> &'static str {
        "edit_layer"
    }

    fn apply(&self, net: &mut NetParameter, index: Option<&LayerIndex>) -> Result<(), EditorError> {
        let index = index.ok_or(EditorError::NotInitialized)?;
        let position = index
            .position(&self.name)
            .ok_or_else(|| EditorError::UnknownLayer(self.name.clone()))?;

        // 先做完所有检查再修改，失败时网络保持原样
        if let Some(new_name) = &self.new_name {
            if new_name != &self.name && index.contains(new_name) {
                return Err(EditorError::DuplicateLayerName(new_name.clone()));
            }
        }
        self.check_multipliers()?;

        let layer = &mut net.layer[position];
        let num_updates = self
            .lr_mult
            .as_ref()
            .or(self.decay_mult.as_ref())
            .map(Vec::len);
        if let Some(n) = num_updates {
            if n != layer.param.len() && (self.lr_mult.is_none() || self.decay_mult.is_none()) {
                return Err(EditorError::InvalidArgument(format!(
                    "层`{}`现有{}组乘子，重建为{}组时需同时给出lr_mult和decay_mult",
                    self.name,
                    layer.param.len(),
                    n
                )));
            }
        }

        if let Some(new_name) = &self.new_name {
            layer.name = new_name.clone();
            if let Some(top) = layer.top.first_mut() {
                *top = new_name.clone();
            }
        }

        if let Some(num_output) = self.num_output {
            if !layer.set_num_output(num_output) {
                warn!(
                    layer = %layer.name,
                    layer_type = %layer.layer_type,
                    "num_output写入了非全连接层的inner_product_param"
                );
            }
        }

        if num_updates.is_some() {
            edit_multipliers(layer, self.lr_mult.as_deref(), self.decay_mult.as_deref());
        }

        if let Some(use_global_stats) = self.use_global_stats {
            if !layer.set_use_global_stats(use_global_stats) {
                warn!(
                    layer = %layer.name,
                    layer_type = %layer.layer_type,
                    "use_global_stats只对BatchNorm层生效，已忽略"
                );
            }
        }
        Ok(())
    }
}

/// 数量一致时逐项更新给出的乘子；数量不一致时清空后按给出的值成对重建
fn edit_multipliers(layer: &mut Layer, lr_mult: Option<&[f32]>, decay_mult: Option<&[f32]>) {
    let num_updates = lr_mult.or(decay_mult).map_or(0, <[f32]>::len);

    if num_updates == layer.param.len() {
        for (i, param) in layer.param.iter_mut().enumerate() {
            if let Some(lr) = lr_mult {
                param.lr_mult = Some(lr[i]);
            }
            if let Some(decay) = decay_mult {
                param.decay_mult = Some(decay[i]);
            }
        }
    } else if let (Some(lr), Some(decay)) = (lr_mult, decay_mult) {
        layer.param = lr
            .iter()
            .zip(decay)
            .map(|(&lr, &decay)| ParamSpec::new(lr, decay))
            .collect();
    }
}
