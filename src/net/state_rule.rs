use crate::errors::EditorError;
use crate::proto::{Scalar, TextMessage};
use std::fmt::{self, Display};

/// 网络所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Train,
    Test,
}

impl Phase {
    fn from_ident(s: &str) -> Option<Self> {
        match s {
            "TRAIN" => Some(Self::Train),
            "TEST" => Some(Self::Test),
            _ => None,
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Train => write!(f, "TRAIN"),
            Self::Test => write!(f, "TEST"),
        }
    }
}

/// 层的启用条件（`include { phase stage }`）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetStateRule {
    pub phase: Option<Phase>,
    pub stage: Vec<String>,
    /// `min_level`、`max_level`、`not_stage`等
    pub rest: TextMessage,
}

impl NetStateRule {
    pub fn phase(phase: Phase) -> Self {
        Self {
            phase: Some(phase),
            ..Self::default()
        }
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage.push(stage.into());
        self
    }

    pub(crate) fn from_message(mut msg: TextMessage) -> Result<Self, EditorError> {
        let phase = match msg.take("phase") {
            None => None,
            Some(value) => {
                let parsed = match value.as_scalar() {
                    Some(Scalar::Ident(s)) => Phase::from_ident(s),
                    Some(Scalar::Int(0)) => Some(Phase::Train),
                    Some(Scalar::Int(1)) => Some(Phase::Test),
                    _ => None,
                };
                Some(parsed.ok_or_else(|| EditorError::field_type("phase", "TRAIN或TEST"))?)
            }
        };
        let stage = msg.take_all_str("stage")?;
        Ok(Self {
            phase,
            stage,
            rest: msg,
        })
    }

    pub(crate) fn to_message(&self) -> TextMessage {
        let mut msg = TextMessage::new();
        if let Some(phase) = self.phase {
            msg.push("phase", Scalar::Ident(phase.to_string()));
        }
        msg.extend(self.rest.clone());
        for stage in &self.stage {
            msg.push("stage", stage.as_str());
        }
        msg
    }
}

impl Display for NetStateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Some(phase) => write!(f, "{phase}")?,
            None => write!(f, "*")?,
        }
        if !self.stage.is_empty() {
            write!(f, "({})", self.stage.join(","))?;
        }
        Ok(())
    }
}
