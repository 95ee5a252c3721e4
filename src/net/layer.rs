/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : 网络中的单个层（对应caffe的LayerParameter）
 */

use super::layer_params::{INNER_PRODUCT, LayerParams};
use super::param_spec::ParamSpec;
use super::state_rule::NetStateRule;
use crate::errors::EditorError;
use crate::proto::{FieldValue, TextMessage};

/// 单个层。`bottom`为输入端口，`top`为输出端口
///
/// 既可以从prototxt中解析得到，也可以用构造方法手工搭建：
/// ```ignore
/// let data = Layer::new("data1", "Data")
///     .top("data")
///     .top("label")
///     .include(NetStateRule::phase(Phase::Train))
///     .extra_message("data_param", data_param)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub layer_type: String,
    pub bottom: Vec<String>,
    pub top: Vec<String>,
    pub param: Vec<ParamSpec>,
    pub include: Vec<NetStateRule>,
    pub params: LayerParams,
    /// 其余字段（transform_param、data_param、exclude等），按原顺序保存
    pub extra: TextMessage,
}

impl Layer {
    pub fn new(name: impl Into<String>, layer_type: impl Into<String>) -> Self {
        let layer_type = layer_type.into();
        Self {
            name: name.into(),
            params: LayerParams::for_type(&layer_type),
            layer_type,
            bottom: Vec::new(),
            top: Vec::new(),
            param: Vec::new(),
            include: Vec::new(),
            extra: TextMessage::new(),
        }
    }

    // ========== 构造 ==========

    pub fn bottom(mut self, bottom: impl Into<String>) -> Self {
        self.bottom.push(bottom.into());
        self
    }

    pub fn top(mut self, top: impl Into<String>) -> Self {
        self.top.push(top.into());
        self
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.param.push(param);
        self
    }

    pub fn include(mut self, rule: NetStateRule) -> Self {
        self.include.push(rule);
        self
    }

    pub fn with_params(mut self, params: LayerParams) -> Self {
        self.params = params;
        self
    }

    /// 追加其它字段。字段名是本类型的参数块（如Convolution层的`convolution_param`）时，
    /// 解析进`params`，与从prototxt载入的层保持一致
    pub fn extra_field(mut self, name: &str, value: impl Into<FieldValue>) -> Result<Self, EditorError> {
        let value = value.into();
        if self.params.field_name() == Some(name) {
            let mut holder = TextMessage::new();
            holder.push(name, value);
            self.params = LayerParams::take_from(&self.layer_type, &mut holder)?;
        } else {
            self.extra.push(name, value);
        }
        Ok(self)
    }

    pub fn extra_message(self, name: &str, value: TextMessage) -> Result<Self, EditorError> {
        self.extra_field(name, value)
    }

    // ========== 编辑 ==========

    /// 设置输出宽度。非全连接层没有对应的强类型字段，仍写入`inner_product_param`块，
    /// 是否合理由调用方负责；返回值表示是否落在了强类型字段上
    pub fn set_num_output(&mut self, num_output: u32) -> bool {
        if let LayerParams::InnerProduct(p) = &mut self.params {
            p.num_output = Some(num_output);
            return true;
        }
        match self.extra.get_message_mut("inner_product_param") {
            Some(block) => block.set("num_output", num_output),
            None => {
                let mut block = TextMessage::new();
                block.push("num_output", num_output);
                self.extra.push("inner_product_param", block);
            }
        }
        false
    }

    pub fn num_output(&self) -> Option<u32> {
        match &self.params {
            LayerParams::InnerProduct(p) => p.num_output,
            LayerParams::Convolution(p) => p.num_output,
            _ => self
                .extra
                .get_message("inner_product_param")
                .and_then(|b| b.get("num_output"))
                .and_then(FieldValue::as_scalar)
                .and_then(|s| s.as_i64())
                .and_then(|v| u32::try_from(v).ok()),
        }
    }

    /// 只对BatchNorm层生效，返回是否生效
    pub fn set_use_global_stats(&mut self, use_global_stats: bool) -> bool {
        match &mut self.params {
            LayerParams::BatchNorm(p) => {
                p.use_global_stats = Some(use_global_stats);
                true
            }
            _ => false,
        }
    }

    pub fn use_global_stats(&self) -> Option<bool> {
        match &self.params {
            LayerParams::BatchNorm(p) => p.use_global_stats,
            _ => None,
        }
    }

    pub fn is_type(&self, layer_type: &str) -> bool {
        self.layer_type == layer_type
    }

    pub fn is_classifier(&self) -> bool {
        self.is_type(INNER_PRODUCT)
    }

    /// 主输出端口名；没有声明`top`时退回层名
    pub fn primary_output(&self) -> &str {
        self.top.first().map_or(self.name.as_str(), String::as_str)
    }

    /// 去掉重复的输出端口（保留首次出现的顺序）
    pub(crate) fn dedup_tops(&mut self) {
        let mut seen = Vec::with_capacity(self.top.len());
        self.top.retain(|t| {
            if seen.contains(t) {
                false
            } else {
                seen.push(t.clone());
                true
            }
        });
    }

    // ========== 文本格式转换 ==========

    pub(crate) fn from_message(mut msg: TextMessage) -> Result<Self, EditorError> {
        let name = msg.take_str("name")?.unwrap_or_default();
        let layer_type = msg.take_str("type")?.unwrap_or_default();
        let bottom = msg.take_all_str("bottom")?;
        let top = msg.take_all_str("top")?;
        let param = msg
            .take_all_messages("param")?
            .into_iter()
            .map(ParamSpec::from_message)
            .collect::<Result<Vec<_>, _>>()?;
        let include = msg
            .take_all_messages("include")?
            .into_iter()
            .map(NetStateRule::from_message)
            .collect::<Result<Vec<_>, _>>()?;
        let params = LayerParams::take_from(&layer_type, &mut msg)?;

        Ok(Self {
            name,
            layer_type,
            bottom,
            top,
            param,
            include,
            params,
            extra: msg,
        })
    }

    pub(crate) fn to_message(&self) -> TextMessage {
        let mut msg = TextMessage::new();
        msg.push("name", self.name.as_str());
        msg.push("type", self.layer_type.as_str());
        for bottom in &self.bottom {
            msg.push("bottom", bottom.as_str());
        }
        for top in &self.top {
            msg.push("top", top.as_str());
        }
        for param in &self.param {
            msg.push("param", param.to_message());
        }
        for rule in &self.include {
            msg.push("include", rule.to_message());
        }
        if let Some((field, block)) = self.params.to_block() {
            msg.push(field, block);
        }
        msg.extend(self.extra.clone());
        msg
    }
}
