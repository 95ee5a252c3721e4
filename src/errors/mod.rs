/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 网络编辑器的统一错误类型
 */

use thiserror::Error;

pub use crate::proto::ParseError;

#[derive(Error, Debug)]
pub enum EditorError {
    // 索引（层名称/层类型缓存）尚未建立，即还没有往网络里放过任何层
    #[error("尚未载入任何层，无法执行该操作")]
    NotInitialized,
    #[error("网络中不存在名为`{0}`的层")]
    UnknownLayer(String),
    #[error(
        "网络使用了旧版的`layers`字段，请先用caffe/tools/upgrade_net_proto_text.cpp升级后再载入"
    )]
    LegacyFormat,
    #[error("参数无效：{0}")]
    InvalidArgument(String),
    #[error("断言失败：{0}")]
    AssertionViolation(String),
    #[error("网络为空，没有可删除的层")]
    EmptyNet,
    #[error("层名称`{0}`在网络中重复")]
    DuplicateLayerName(String),

    // 文本格式本身合法，但字段取值与网络描述的结构不符
    #[error("字段`{field}`的类型不符：期望{expected}")]
    FieldType {
        field: String,
        expected: &'static str,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    pub(crate) fn field_type(field: &str, expected: &'static str) -> Self {
        Self::FieldType {
            field: field.to_string(),
            expected,
        }
    }
}
