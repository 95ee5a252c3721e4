use thiserror::Error;

/// 文本格式解析错误（行、列均从1开始计数）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("第{line}行第{column}列：{message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}
