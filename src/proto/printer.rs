use super::message::{FieldValue, TextMessage};
use std::fmt::{self, Display, Write};

/// 输出为protobuf风格的文本：每行一个字段，子消息缩进2格
pub fn to_text(msg: &TextMessage) -> String {
    msg.to_string()
}

impl Display for TextMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_message(f, self, 0)
    }
}

/// 以`indent`级缩进把消息写入任意`fmt::Write`
pub fn write_message<W: Write>(out: &mut W, msg: &TextMessage, indent: usize) -> fmt::Result {
    let pad = "  ".repeat(indent);
    for (name, value) in msg.iter() {
        match value {
            FieldValue::Scalar(s) => writeln!(out, "{pad}{name}: {s}")?,
            FieldValue::Message(m) => {
                writeln!(out, "{pad}{name} {{")?;
                write_message(out, m, indent + 1)?;
                writeln!(out, "{pad}}}")?;
            }
        }
    }
    Ok(())
}
