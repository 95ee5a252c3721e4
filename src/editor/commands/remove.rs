use super::super::index::LayerIndex;
use super::NetCommand;
use crate::errors::EditorError;
use crate::net::NetParameter;

/// 删除末尾的层
///
/// - `until`为None：只删除最后一层
/// - `until`为层名：一直删到该层成为最后一层（该层本身保留）；网络中没有该层时删光所有层
#[derive(Debug, Clone, Default)]
pub struct RemoveLast {
    pub until: Option<String>,
}

impl RemoveLast {
    pub fn one() -> Self {
        Self { until: None }
    }

    pub fn until(name: impl Into<String>) -> Self {
        Self {
            until: Some(name.into()),
        }
    }
}

impl NetCommand for RemoveLast {
    fn name(&self) -> &'static str {
        "remove_last"
    }

    fn apply(&self, net: &mut NetParameter, _index: Option<&LayerIndex>) -> Result<(), EditorError> {
        if net.layer.is_empty() {
            return Err(EditorError::EmptyNet);
        }

        match &self.until {
            None => {
                net.layer.pop();
            }
            Some(until) => {
                let keep = net
                    .layer
                    .iter()
                    .rposition(|l| &l.name == until)
                    .map_or(0, |i| i + 1);
                net.layer.truncate(keep);
            }
        }
        Ok(())
    }
}
