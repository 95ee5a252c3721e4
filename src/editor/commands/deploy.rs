/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 训练/验证网络 -> 部署网络
 */

use super::super::config::DeployOptions;
use super::super::index::LayerIndex;
use super::append::push_layer;
use super::NetCommand;
use crate::errors::EditorError;
use crate::net::layer_types::SOFTMAX;
use crate::net::{Layer, NetParameter};

/// 转换为部署网络：
/// 1. 删掉数据源、损失、评估指标层；
/// 2. 其余层清空`include`与乘子；
/// 3. 要求最后一层是分类头（全连接层），在其后追加Softmax概率层；
/// 4. 以第一层的第一个输入作为网络输入，并声明输入形状
#[derive(Debug, Clone, Default)]
pub struct Deploy {
    pub options: DeployOptions,
}

impl Deploy {
    pub fn new(options: DeployOptions) -> Self {
        Self { options }
    }

    pub fn with_input_shape(input_shape: &[usize]) -> Self {
        Self::new(DeployOptions::default().with_input_shape(input_shape))
    }
}

impl NetCommand for Deploy {
    fn name(&self) -> &'static str {
        "deploy"
    }

    fn apply(&self, net: &mut NetParameter, _index: Option<&LayerIndex>) -> Result<(), EditorError> {
        let options = &self.options;
        if options.input_shape.len() != 4 {
            return Err(EditorError::InvalidArgument(format!(
                "输入形状必须是(批大小, 通道数, 高, 宽)4个维度，实际为{:?}",
                options.input_shape
            )));
        }

        // 先确认删除后的网络满足条件，再动手修改
        let kept: Vec<&Layer> = net
            .layer
            .iter()
            .filter(|l| !options.should_drop(&l.layer_type))
            .collect();
        let Some(classifier) = kept.last() else {
            return Err(EditorError::AssertionViolation(
                "删除数据/损失/评估层后网络为空".to_string(),
            ));
        };
        if classifier.layer_type != options.classifier_type {
            return Err(EditorError::AssertionViolation(format!(
                "最后一层`{}`的类型为{}，期望{}",
                classifier.name, classifier.layer_type, options.classifier_type
            )));
        }
        let classifier_output = classifier.primary_output().to_string();
        let input_name = kept
            .first()
            .and_then(|l| l.bottom.first())
            .cloned()
            .ok_or_else(|| {
                EditorError::AssertionViolation(format!("第一层`{}`没有输入端口", kept[0].name))
            })?;
        if kept.iter().any(|l| l.name == options.prob_layer) {
            return Err(EditorError::DuplicateLayerName(options.prob_layer.clone()));
        }

        net.layer.retain(|l| !options.should_drop(&l.layer_type));
        for layer in &mut net.layer {
            layer.include.clear();
            layer.param.clear();
        }

        let prob = Layer::new(options.prob_layer.as_str(), SOFTMAX)
            .bottom(classifier_output)
            .top(options.prob_layer.as_str());
        push_layer(net, prob)?;

        net.input.push(input_name);
        net.input_dim.extend_from_slice(&options.input_shape);
        Ok(())
    }
}
