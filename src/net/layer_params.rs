/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : 按层类型区分的参数块（convolution_param、inner_product_param等）
 *                 只把编辑时用得到的字段做成强类型，其余字段原样保存在`rest`中
 */

use crate::errors::EditorError;
use crate::proto::TextMessage;

pub const CONVOLUTION: &str = "Convolution";
pub const INNER_PRODUCT: &str = "InnerProduct";
pub const SCALE: &str = "Scale";
pub const BATCH_NORM: &str = "BatchNorm";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvolutionParam {
    pub num_output: Option<u32>,
    pub bias_term: Option<bool>,
    pub rest: TextMessage,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InnerProductParam {
    pub num_output: Option<u32>,
    pub bias_term: Option<bool>,
    pub rest: TextMessage,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScaleParam {
    pub bias_term: Option<bool>,
    pub rest: TextMessage,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchNormParam {
    pub use_global_stats: Option<bool>,
    pub rest: TextMessage,
}

/// 层的类型专属参数。未建模的层类型整体存为`Opaque`，其参数块留在层的`extra`里
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LayerParams {
    Convolution(ConvolutionParam),
    InnerProduct(InnerProductParam),
    Scale(ScaleParam),
    BatchNorm(BatchNormParam),
    #[default]
    Opaque,
}

impl LayerParams {
    /// 该类型的默认参数块
    pub fn for_type(layer_type: &str) -> Self {
        match layer_type {
            CONVOLUTION => Self::Convolution(ConvolutionParam::default()),
            INNER_PRODUCT => Self::InnerProduct(InnerProductParam::default()),
            SCALE => Self::Scale(ScaleParam::default()),
            BATCH_NORM => Self::BatchNorm(BatchNormParam::default()),
            _ => Self::Opaque,
        }
    }

    /// 参数块在prototxt中的字段名
    pub const fn field_name(&self) -> Option<&'static str> {
        match self {
            Self::Convolution(_) => Some("convolution_param"),
            Self::InnerProduct(_) => Some("inner_product_param"),
            Self::Scale(_) => Some("scale_param"),
            Self::BatchNorm(_) => Some("batch_norm_param"),
            Self::Opaque => None,
        }
    }

    /// 是否带偏置项（决定冻结时需要几组乘子）
    pub fn has_bias(&self) -> bool {
        match self {
            // caffe中卷积与全连接层的bias_term默认为true，Scale层默认为false
            Self::Convolution(p) => p.bias_term.unwrap_or(true),
            Self::InnerProduct(p) => p.bias_term.unwrap_or(true),
            Self::Scale(p) => p.bias_term.unwrap_or(false),
            Self::BatchNorm(_) | Self::Opaque => false,
        }
    }

    /// 从层消息中取出与`layer_type`对应的参数块
    pub(crate) fn take_from(layer_type: &str, layer: &mut TextMessage) -> Result<Self, EditorError> {
        let mut params = Self::for_type(layer_type);
        let Some(field) = params.field_name() else {
            return Ok(params);
        };
        let Some(mut block) = layer.take_message(field)? else {
            return Ok(params);
        };

        match &mut params {
            Self::Convolution(p) => {
                p.num_output = take_u32(&mut block, "num_output")?;
                p.bias_term = take_bool(&mut block, "bias_term")?;
                p.rest = block;
            }
            Self::InnerProduct(p) => {
                p.num_output = take_u32(&mut block, "num_output")?;
                p.bias_term = take_bool(&mut block, "bias_term")?;
                p.rest = block;
            }
            Self::Scale(p) => {
                p.bias_term = take_bool(&mut block, "bias_term")?;
                p.rest = block;
            }
            Self::BatchNorm(p) => {
                p.use_global_stats = take_bool(&mut block, "use_global_stats")?;
                p.rest = block;
            }
            Self::Opaque => {}
        }
        Ok(params)
    }

    /// 转回`(字段名, 参数块)`；参数块为空时返回None，不输出空的`xxx_param {}`
    pub(crate) fn to_block(&self) -> Option<(&'static str, TextMessage)> {
        let field = self.field_name()?;
        let mut block = TextMessage::new();
        match self {
            Self::Convolution(p) => {
                push_opt(&mut block, "num_output", p.num_output);
                push_opt(&mut block, "bias_term", p.bias_term);
                block.extend(p.rest.clone());
            }
            Self::InnerProduct(p) => {
                push_opt(&mut block, "num_output", p.num_output);
                push_opt(&mut block, "bias_term", p.bias_term);
                block.extend(p.rest.clone());
            }
            Self::Scale(p) => {
                block.extend(p.rest.clone());
                push_opt(&mut block, "bias_term", p.bias_term);
            }
            Self::BatchNorm(p) => {
                push_opt(&mut block, "use_global_stats", p.use_global_stats);
                block.extend(p.rest.clone());
            }
            Self::Opaque => {}
        }
        (!block.is_empty()).then_some((field, block))
    }
}

fn take_u32(block: &mut TextMessage, field: &str) -> Result<Option<u32>, EditorError> {
    let value = block
        .get_i64(field)?
        .map(|v| u32::try_from(v).map_err(|_| EditorError::field_type(field, "非负整数")))
        .transpose()?;
    block.remove_all(field);
    Ok(value)
}

fn take_bool(block: &mut TextMessage, field: &str) -> Result<Option<bool>, EditorError> {
    let value = block.get_bool(field)?;
    block.remove_all(field);
    Ok(value)
}

fn push_opt<T>(block: &mut TextMessage, field: &str, value: Option<T>)
where
    crate::proto::FieldValue: From<T>,
{
    if let Some(v) = value {
        block.push(field, v);
    }
}
