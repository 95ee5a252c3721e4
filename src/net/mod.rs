/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : caffe网络描述的强类型模型
 *
 * - net_parameter.rs: 整个网络 + prototxt读写
 * - layer.rs: 单个层
 * - layer_params.rs: 按层类型区分的参数块
 * - param_spec.rs: 可学习参数的乘子
 * - state_rule.rs: 层的启用条件（phase/stage）
 */

mod layer;
mod layer_params;
mod net_parameter;
mod param_spec;
mod state_rule;

#[cfg(test)]
mod tests;

pub use layer::Layer;
pub use layer_params::{
    BATCH_NORM, BatchNormParam, CONVOLUTION, ConvolutionParam, INNER_PRODUCT, InnerProductParam,
    LayerParams, SCALE, ScaleParam,
};
pub use net_parameter::NetParameter;
pub use param_spec::ParamSpec;
pub use state_rule::{NetStateRule, Phase};

/// 其余在编辑时会用到的层类型名
pub mod layer_types {
    pub use super::layer_params::{BATCH_NORM, CONVOLUTION, INNER_PRODUCT, SCALE};

    pub const DATA: &str = "Data";
    pub const SOFTMAX: &str = "Softmax";
    pub const SOFTMAX_WITH_LOSS: &str = "SoftmaxWithLoss";
    pub const ACCURACY: &str = "Accuracy";
}
