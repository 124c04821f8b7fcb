use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::layer::Layer;

/// Value kind of a declared prop. Text is the only kind so far; adding one
/// forces every `match` over it to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PropType {
    #[default]
    Text,
}

/// A prop declared on a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropDefinition {
    pub name: String,
    #[serde(default)]
    pub prop_type: PropType,
}

impl PropDefinition {
    pub fn text(name: impl Into<String>) -> Self {
        Self { name: name.into(), prop_type: PropType::Text }
    }
}

/// A usage example: literal values for some of the component's props,
/// shown next to the generated code samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentExample {
    pub name: String,
    #[serde(default)]
    pub props: BTreeMap<String, String>,
}

/// A named, reusable unit: declared props, an optional layer tree, and
/// usage examples. `layout` is absent until the first layer is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layer>,
    #[serde(default)]
    pub props: Vec<PropDefinition>,
    #[serde(default)]
    pub examples: Vec<ComponentExample>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layout: None,
            props: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn has_prop(&self, name: &str) -> bool {
        self.props.iter().any(|p| p.name == name)
    }

    pub fn example_mut(&mut self, name: &str) -> Option<&mut ComponentExample> {
        self.examples.iter_mut().find(|e| e.name == name)
    }
}
