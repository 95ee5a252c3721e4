//! # protobuf 文本格式（prototxt）
//!
//! 不依赖 `.proto` 描述文件的文本格式读写：解析结果是一棵按出现顺序保存字段的
//! [`TextMessage`] 树，上层的 [`crate::net`] 再从中取出自己关心的字段。
//!
//! ```ignore
//! use caffe_net_editor::proto::{parse, to_text};
//!
//! let msg = parse("name: \"net\"\nlayer { name: \"conv1\" type: \"Convolution\" }")?;
//! assert_eq!(msg.get_str("name")?, Some("net"));
//! print!("{}", to_text(&msg));
//! ```

mod error;
mod lexer;
mod message;
mod parser;
mod printer;


pub use error::ParseError;
pub use message::{FieldValue, Scalar, TextMessage};
pub use parser::{MAX_DEPTH, parse};
pub use printer::{to_text, write_message};
