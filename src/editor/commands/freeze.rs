use super::super::index::LayerIndex;
use super::NetCommand;
use crate::errors::EditorError;
use crate::net::{BATCH_NORM, CONVOLUTION, NetParameter, ParamSpec, SCALE};

/// 冻结所有可学习层：把乘子设为0，微调时这些层的参数保持不变
#[derive(Debug, Clone, Copy, Default)]
pub struct FreezeAll;

impl NetCommand for FreezeAll {
    fn name(&self) -> &'static str {
        "freeze_all"
    }

    fn apply(&self, net: &mut NetParameter, index: Option<&LayerIndex>) -> Result<(), EditorError> {
        if index.is_none() {
            return Err(EditorError::NotInitialized);
        }
        freeze_layers(net);
        Ok(())
    }
}

/// - Convolution/Scale层：尚无乘子时补上`(0, 0)`，带偏置补两组，否则一组；已有乘子的不动
/// - BatchNorm层：无条件追加三组`lr_mult: 0`（对应均值、方差、滑动系数三个统计量）
///
/// 注意BatchNorm层的处理不是幂等的，连续冻结两次会得到6组乘子
pub(crate) fn freeze_layers(net: &mut NetParameter) {
    for layer in &mut net.layer {
        match layer.layer_type.as_str() {
            CONVOLUTION | SCALE => {
                if layer.param.is_empty() {
                    let count = if layer.params.has_bias() { 2 } else { 1 };
                    layer
                        .param
                        .extend(std::iter::repeat_n(ParamSpec::new(0.0, 0.0), count));
                }
            }
            BATCH_NORM => {
                layer
                    .param
                    .extend(std::iter::repeat_n(ParamSpec::lr_only(0.0), 3));
            }
            _ => {}
        }
    }
}
