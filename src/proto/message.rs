/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 文本格式的字段树：保留字段出现顺序，不做任何模式（schema）校验
 */

use crate::errors::EditorError;
use std::fmt::{self, Display};

/// 标量值。枚举值与布尔值在文本格式里都是不带引号的标识符，统一存为`Ident`
#[derive(Debug, Clone)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Ident(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Ident(s) => match s.as_str() {
                "true" | "True" | "t" => Some(true),
                "false" | "False" | "f" => Some(false),
                _ => None,
            },
            Self::Int(1) => Some(true),
            Self::Int(0) => Some(false),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Ident(s) => match s.to_ascii_lowercase().as_str() {
                "inf" | "infinity" => Some(f64::INFINITY),
                "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
                "nan" | "-nan" => Some(f64::NAN),
                _ => None,
            },
            Self::Str(_) => None,
        }
    }
}

/// 数值按值比较：整数值的浮点数输出后不带小数点，读回时是`Int`
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(i), Self::Float(f)) | (Self::Float(f), Self::Int(i)) => *i as f64 == *f,
            (Self::Str(a), Self::Str(b)) | (Self::Ident(a), Self::Ident(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Ident(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{}", format_float(*v)),
            Self::Str(s) => write!(f, "\"{}\"", escape(s)),
            Self::Ident(s) => write!(f, "{s}"),
        }
    }
}

/// 与protobuf的输出保持一致：整数值的浮点数不带小数点，特殊值输出为`inf`/`-inf`/`nan`
fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        let s = if v > 0.0 { "inf" } else { "-inf" };
        s.to_string()
    } else {
        // f32字段经f64存储后会带上多余的尾数，按f32最短表示输出；
        // 绝对值不小于1e16时用指数形式，否则整数值会被读成越界的整数
        let narrowed = v as f32;
        let is_f32 = f64::from(narrowed) == v;
        match (is_f32, v.abs() >= 1e16) {
            (true, false) => format!("{narrowed}"),
            (true, true) => format!("{narrowed:e}"),
            (false, false) => format!("{v}"),
            (false, true) => format!("{v:e}"),
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Scalar),
    Message(TextMessage),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Message(_) => None,
        }
    }

    pub fn as_message(&self) -> Option<&TextMessage> {
        match self {
            Self::Message(m) => Some(m),
            Self::Scalar(_) => None,
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! impl_scalar_field_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(value: $t) -> Self {
                    Self::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

impl_scalar_field_value!(&str, String, bool, i64, u32, f32);

impl From<TextMessage> for FieldValue {
    fn from(value: TextMessage) -> Self {
        Self::Message(value)
    }
}

/// 一条消息：按出现顺序保存的`(字段名, 值)`列表，同名字段即repeated字段
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextMessage {
    fields: Vec<(String, FieldValue)>,
}

impl TextMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FieldValue> + 'a {
        self.fields
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn get_message(&self, name: &str) -> Option<&TextMessage> {
        self.get(name).and_then(FieldValue::as_message)
    }

    pub fn get_message_mut(&mut self, name: &str) -> Option<&mut TextMessage> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| match v {
                FieldValue::Message(m) => Some(m),
                FieldValue::Scalar(_) => None,
            })
    }

    fn get_scalar(&self, name: &str, expected: &'static str) -> Result<Option<&Scalar>, EditorError> {
        match self.get(name) {
            None => Ok(None),
            Some(FieldValue::Scalar(s)) => Ok(Some(s)),
            Some(FieldValue::Message(_)) => Err(EditorError::field_type(name, expected)),
        }
    }

    pub fn get_str(&self, name: &str) -> Result<Option<&str>, EditorError> {
        self.get_scalar(name, "字符串")?
            .map(|s| s.as_str().ok_or_else(|| EditorError::field_type(name, "字符串")))
            .transpose()
    }

    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, EditorError> {
        self.get_scalar(name, "布尔值")?
            .map(|s| s.as_bool().ok_or_else(|| EditorError::field_type(name, "布尔值")))
            .transpose()
    }

    pub fn get_i64(&self, name: &str) -> Result<Option<i64>, EditorError> {
        self.get_scalar(name, "整数")?
            .map(|s| s.as_i64().ok_or_else(|| EditorError::field_type(name, "整数")))
            .transpose()
    }

    pub fn get_f64(&self, name: &str) -> Result<Option<f64>, EditorError> {
        self.get_scalar(name, "数值")?
            .map(|s| s.as_f64().ok_or_else(|| EditorError::field_type(name, "数值")))
            .transpose()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.push((name.into(), value.into()));
    }

    /// 覆盖第一个同名字段并删除其余同名字段；不存在时追加到末尾
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        match self.fields.iter().position(|(n, _)| n == name) {
            Some(first) => {
                self.fields[first].1 = value;
                let mut index = 0;
                self.fields.retain(|(n, _)| {
                    let keep = index <= first || n != name;
                    index += 1;
                    keep
                });
            }
            None => self.fields.push((name.to_string(), value)),
        }
    }

    /// 删除所有同名字段，返回删除的个数
    pub fn remove_all(&mut self, name: &str) -> usize {
        let before = self.fields.len();
        self.fields.retain(|(n, _)| n != name);
        before - self.fields.len()
    }

    /// 取出所有同名字段（按出现顺序）
    pub fn take_all(&mut self, name: &str) -> Vec<FieldValue> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.fields.len());
        for (n, v) in self.fields.drain(..) {
            if n == name {
                taken.push(v);
            } else {
                kept.push((n, v));
            }
        }
        self.fields = kept;
        taken
    }

    /// 取出第一个同名字段
    pub fn take(&mut self, name: &str) -> Option<FieldValue> {
        let index = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(index).1)
    }

    /// 取出第一个同名的消息字段；字段存在但不是消息时报错
    pub fn take_message(&mut self, name: &str) -> Result<Option<TextMessage>, EditorError> {
        match self.take(name) {
            None => Ok(None),
            Some(FieldValue::Message(m)) => Ok(Some(m)),
            Some(FieldValue::Scalar(_)) => Err(EditorError::field_type(name, "消息")),
        }
    }

    pub fn take_str(&mut self, name: &str) -> Result<Option<String>, EditorError> {
        match self.take(name) {
            None => Ok(None),
            Some(FieldValue::Scalar(Scalar::Str(s))) => Ok(Some(s)),
            Some(_) => Err(EditorError::field_type(name, "字符串")),
        }
    }

    pub fn take_all_str(&mut self, name: &str) -> Result<Vec<String>, EditorError> {
        self.take_all(name)
            .into_iter()
            .map(|v| match v {
                FieldValue::Scalar(Scalar::Str(s)) => Ok(s),
                _ => Err(EditorError::field_type(name, "字符串")),
            })
            .collect()
    }

    pub fn take_all_messages(&mut self, name: &str) -> Result<Vec<TextMessage>, EditorError> {
        self.take_all(name)
            .into_iter()
            .map(|v| match v {
                FieldValue::Message(m) => Ok(m),
                FieldValue::Scalar(_) => Err(EditorError::field_type(name, "消息")),
            })
            .collect()
    }

    /// 把另一条消息的字段依次追加到本消息末尾
    pub fn extend(&mut self, other: TextMessage) {
        self.fields.extend(other.fields);
    }
}
