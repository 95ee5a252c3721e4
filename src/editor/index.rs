use crate::net::NetParameter;

/// 层名称与层类型的索引，与层列表一一对应
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayerIndex {
    names: Vec<String>,
    types: Vec<String>,
}

impl LayerIndex {
    pub fn build(net: &NetParameter) -> Self {
        Self {
            names: net.layer.iter().map(|l| l.name.clone()).collect(),
            types: net.layer.iter().map(|l| l.layer_type.clone()).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}
