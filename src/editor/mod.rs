/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 网络编辑器：在一个caffe网络上依次执行追加/删除/修改/冻结/部署等命令
 *
 * - commands/: 各编辑命令
 * - index.rs: 层名称/层类型索引
 * - config.rs: 部署配置
 * - describe.rs: 摘要表格 + JSON描述
 */

mod commands;
mod config;
mod describe;
mod index;

#[cfg(test)]
mod tests;

pub use commands::{
    AppendLayer, AppendNet, Deploy, EditCommand, EditLayer, FreezeAll, NetCommand, RemoveLast,
};
pub use config::DeployOptions;
pub use describe::{InputDescriptor, LayerDescriptor, NetDescriptor};
pub use index::LayerIndex;

use crate::errors::EditorError;
use crate::net::{Layer, NetParameter};
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// 网络编辑器
///
/// 典型用法（部署网络 -> 微调用的训练网络）：
/// ```ignore
/// let mut editor = NetEditor::new("myResNet");
/// editor.append_layer(data_train)?;
/// editor.append_net_file("ResNet-50-deploy.prototxt", true)?;
/// editor.remove_last(None)?;
/// editor.edit_layer(EditLayer::new("fc1000").rename("fc3").num_output(3))?;
/// editor.append_layer(loss)?;
/// editor.save("ResNet-50-train-val.prototxt")?;
/// ```
#[derive(Debug, Clone)]
pub struct NetEditor {
    net: NetParameter,
    // None表示还没有载入过任何层
    index: Option<LayerIndex>,
}

impl NetEditor {
    /// 创建空网络
    pub fn new(name: &str) -> Self {
        Self {
            net: NetParameter::new(name),
            index: None,
        }
    }

    /// 以已有网络为起点：保留网络名、输入声明等，层按`append_net`的规则载入（不冻结）
    ///
    /// 旧版`layers`格式、重名的层都会报错；重复的输出端口被合并
    pub fn from_net(mut net: NetParameter) -> Result<Self, EditorError> {
        let source = NetParameter {
            layer: std::mem::take(&mut net.layer),
            legacy_layers: net.legacy_layers.clone(),
            ..NetParameter::new(net.name.as_str())
        };
        let mut editor = Self { net, index: None };
        editor.append_net(source, false)?;
        Ok(editor)
    }

    // ========== 命令 ==========

    /// 执行一条编辑命令，之后重建索引
    ///
    /// 失败时不回滚；若此前从未建立过索引，则失败后编辑器仍视为未载入
    pub fn apply(&mut self, command: impl Into<EditCommand>) -> Result<(), EditorError> {
        let command = command.into();
        let result = command.apply(&mut self.net, self.index.as_ref());
        if result.is_ok() || self.index.is_some() {
            self.index = Some(LayerIndex::build(&self.net));
        }

        match &result {
            Ok(()) => debug!(
                command = command.name(),
                layers = self.net.layer.len(),
                "编辑命令执行完毕"
            ),
            Err(e) => warn!(command = command.name(), error = %e, "编辑命令执行失败"),
        }
        result
    }

    pub fn append_layer(&mut self, layer: Layer) -> Result<(), EditorError> {
        self.apply(AppendLayer::new(layer))
    }

    pub fn append_net(&mut self, source: NetParameter, auto_freeze: bool) -> Result<(), EditorError> {
        self.apply(AppendNet::new(source, auto_freeze))
    }

    /// 载入prototxt文件并追加其全部层
    pub fn append_net_file<P: AsRef<Path>>(&mut self, path: P, auto_freeze: bool) -> Result<(), EditorError> {
        let source = NetParameter::open(path)?;
        self.append_net(source, auto_freeze)
    }

    pub fn remove_last(&mut self, until: Option<&str>) -> Result<(), EditorError> {
        self.apply(RemoveLast {
            until: until.map(str::to_string),
        })
    }

    pub fn edit_layer(&mut self, edit: EditLayer) -> Result<(), EditorError> {
        self.apply(edit)
    }

    pub fn freeze_all(&mut self) -> Result<(), EditorError> {
        self.apply(FreezeAll)
    }

    /// 以默认配置转换为部署网络，`input_shape`为(批大小, 通道数, 高, 宽)
    pub fn deploy(&mut self, input_shape: &[usize]) -> Result<(), EditorError> {
        self.apply(Deploy::with_input_shape(input_shape))
    }

    pub fn deploy_with(&mut self, options: &DeployOptions) -> Result<(), EditorError> {
        self.apply(Deploy::new(options.clone()))
    }

    // ========== 查询 ==========

    pub fn is_initialized(&self) -> bool {
        self.index.is_some()
    }

    pub fn name(&self) -> &str {
        &self.net.name
    }

    pub fn len(&self) -> usize {
        self.net.layer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.net.layer.is_empty()
    }

    /// 整个网络
    pub fn show(&self) -> &NetParameter {
        &self.net
    }

    pub fn layer(&self, name: &str) -> Result<&Layer, EditorError> {
        self.index
            .as_ref()
            .and_then(|index| index.position(name))
            .map(|i| &self.net.layer[i])
            .ok_or_else(|| EditorError::UnknownLayer(name.to_string()))
    }

    pub fn layer_names(&self) -> &[String] {
        self.index.as_ref().map(LayerIndex::names).unwrap_or_default()
    }

    pub fn layer_types(&self) -> &[String] {
        self.index.as_ref().map(LayerIndex::types).unwrap_or_default()
    }

    pub fn into_net(self) -> NetParameter {
        self.net
    }

    // ========== 输出 ==========

    pub fn to_text(&self) -> String {
        self.net.to_text()
    }

    pub fn serialize<W: Write>(&self, writer: &mut W) -> Result<(), EditorError> {
        self.net.write_to(writer)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), EditorError> {
        self.net.save(path)
    }
}
