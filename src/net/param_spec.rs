use crate::errors::EditorError;
use crate::proto::TextMessage;

/// 可学习参数的乘子（对应caffe的`param { lr_mult decay_mult }`）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamSpec {
    pub name: Option<String>,
    pub lr_mult: Option<f32>,
    pub decay_mult: Option<f32>,
    /// `share_mode`等未建模的字段
    pub rest: TextMessage,
}

impl ParamSpec {
    pub fn new(lr_mult: f32, decay_mult: f32) -> Self {
        Self {
            lr_mult: Some(lr_mult),
            decay_mult: Some(decay_mult),
            ..Self::default()
        }
    }

    /// 只设置学习率乘子（BatchNorm的滑动统计量就是这么冻结的）
    pub fn lr_only(lr_mult: f32) -> Self {
        Self {
            lr_mult: Some(lr_mult),
            ..Self::default()
        }
    }

    /// 学习率乘子为0，即训练时不更新（caffe中未设置时默认为1）
    pub fn is_frozen(&self) -> bool {
        self.lr_mult.unwrap_or(1.0) == 0.0
    }

    pub(crate) fn from_message(mut msg: TextMessage) -> Result<Self, EditorError> {
        let name = msg.take_str("name")?;
        let lr_mult = msg.get_f64("lr_mult")?.map(|v| v as f32);
        let decay_mult = msg.get_f64("decay_mult")?.map(|v| v as f32);
        msg.remove_all("lr_mult");
        msg.remove_all("decay_mult");
        Ok(Self {
            name,
            lr_mult,
            decay_mult,
            rest: msg,
        })
    }

    pub(crate) fn to_message(&self) -> TextMessage {
        let mut msg = TextMessage::new();
        if let Some(name) = &self.name {
            msg.push("name", name.as_str());
        }
        msg.extend(self.rest.clone());
        if let Some(lr) = self.lr_mult {
            msg.push("lr_mult", lr);
        }
        if let Some(decay) = self.decay_mult {
            msg.push("decay_mult", decay);
        }
        msg
    }
}
