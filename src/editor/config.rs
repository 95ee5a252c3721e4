//! 部署转换的配置
//!
//! 可以直接用默认值，也可以从JSON文件载入：
//!
//! ```json
//! {
//!   "input_shape": [1, 3, 227, 227],
//!   "prob_layer": "prob",
//!   "drop_types": ["Data", "ImageData", "SoftmaxWithLoss", "Accuracy"],
//!   "classifier_type": "InnerProduct"
//! }
//! ```
//! 未给出的字段取默认值。

use crate::errors::EditorError;
use crate::net::layer_types::{ACCURACY, DATA, INNER_PRODUCT, SOFTMAX_WITH_LOSS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployOptions {
    /// 部署网络的输入形状：(批大小, 通道数, 高, 宽)
    pub input_shape: Vec<usize>,
    /// 末尾追加的Softmax层的名称
    pub prob_layer: String,
    /// 部署时要删掉的层类型（数据源、损失、评估指标）
    pub drop_types: Vec<String>,
    /// 删除后最后一层必须是的类型（分类头）
    pub classifier_type: String,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            input_shape: vec![1, 3, 224, 224],
            prob_layer: "prob".to_string(),
            drop_types: vec![
                DATA.to_string(),
                SOFTMAX_WITH_LOSS.to_string(),
                ACCURACY.to_string(),
            ],
            classifier_type: INNER_PRODUCT.to_string(),
        }
    }
}

impl DeployOptions {
    pub fn with_input_shape(mut self, input_shape: &[usize]) -> Self {
        self.input_shape = input_shape.to_vec();
        self
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        serde_json::from_str(json)
            .map_err(|e| EditorError::InvalidArgument(format!("部署配置解析失败: {e}")))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, EditorError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub(crate) fn should_drop(&self, layer_type: &str) -> bool {
        self.drop_types.iter().any(|t| t == layer_type)
    }
}
