/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : 整个网络（对应caffe的NetParameter）及其prototxt读写
 */

use super::layer::Layer;
use crate::errors::EditorError;
use crate::proto::{self, FieldValue, Scalar, TextMessage};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetParameter {
    pub name: String,
    /// 部署网络的外部输入名（旧式写法：`input` + `input_dim`）
    pub input: Vec<String>,
    /// 每个输入4个维度，按`input`的顺序平铺
    pub input_dim: Vec<usize>,
    pub layer: Vec<Layer>,
    /// 旧版（V1）的`layers`字段，不解析，只用于判断是否需要升级
    pub legacy_layers: Vec<TextMessage>,
    /// `force_backward`、`state`、`input_shape`等
    pub extra: TextMessage,
}

impl NetParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 读取prototxt文件
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let net = Self::from_text(&text)?;
        info!(
            path = %path.display(),
            layers = net.layer.len(),
            "载入网络`{}`",
            net.name
        );
        Ok(net)
    }

    pub fn from_text(text: &str) -> Result<Self, EditorError> {
        Self::from_message(proto::parse(text)?)
    }

    pub fn to_text(&self) -> String {
        proto::to_text(&self.to_message())
    }

    /// 写入任意输出流
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), EditorError> {
        writer.write_all(self.to_text().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), EditorError> {
        let path = path.as_ref();
        fs::write(path, self.to_text())?;
        info!(
            path = %path.display(),
            layers = self.layer.len(),
            "保存网络`{}`",
            self.name
        );
        Ok(())
    }

    /// 只有旧版`layers`而没有新版`layer`的网络需要先升级
    pub fn is_legacy(&self) -> bool {
        self.layer.is_empty() && !self.legacy_layers.is_empty()
    }

    pub fn find_layer(&self, name: &str) -> Option<&Layer> {
        self.layer.iter().find(|l| l.name == name)
    }

    pub(crate) fn from_message(mut msg: TextMessage) -> Result<Self, EditorError> {
        let name = msg.take_str("name")?.unwrap_or_default();
        let input = msg.take_all_str("input")?;
        let input_dim = msg
            .take_all("input_dim")
            .into_iter()
            .map(|v| match v {
                FieldValue::Scalar(Scalar::Int(d)) => {
                    usize::try_from(d).map_err(|_| EditorError::field_type("input_dim", "非负整数"))
                }
                _ => Err(EditorError::field_type("input_dim", "非负整数")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let layer = msg
            .take_all_messages("layer")?
            .into_iter()
            .map(Layer::from_message)
            .collect::<Result<Vec<_>, _>>()?;
        let legacy_layers = msg.take_all_messages("layers")?;

        Ok(Self {
            name,
            input,
            input_dim,
            layer,
            legacy_layers,
            extra: msg,
        })
    }

    pub(crate) fn to_message(&self) -> TextMessage {
        let mut msg = TextMessage::new();
        if !self.name.is_empty() {
            msg.push("name", self.name.as_str());
        }
        for input in &self.input {
            msg.push("input", input.as_str());
        }
        for &dim in &self.input_dim {
            msg.push("input_dim", dim as i64);
        }
        msg.extend(self.extra.clone());
        for layer in &self.layer {
            msg.push("layer", layer.to_message());
        }
        for legacy in &self.legacy_layers {
            msg.push("layers", legacy.clone());
        }
        msg
    }
}
