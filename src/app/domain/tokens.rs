use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::layer::Length;

/// A named color token. The value is a hex literal, e.g. `#0366D6`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorDefinition {
    pub name: String,
    pub value: String,
}

/// A named font size token. The value is a CSS length, e.g. `16px`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSizeDefinition {
    pub name: String,
    pub value: String,
}

/// A named font family token. The value is a CSS font stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFamilyDefinition {
    pub name: String,
    pub value: String,
}

/// A named minimum-width threshold referenced by responsive style
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakpointDefinition {
    pub name: String,
    pub value: Length,
}

pub type ColorsMap = BTreeMap<String, ColorDefinition>;
pub type FontSizesMap = BTreeMap<String, FontSizeDefinition>;
pub type FontFamiliesMap = BTreeMap<String, FontFamilyDefinition>;
pub type BreakpointsMap = BTreeMap<String, BreakpointDefinition>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_serialization_round_trip() {
        let mut breakpoints = BreakpointsMap::new();
        breakpoints.insert(
            "breakpoint-md".to_string(),
            BreakpointDefinition {
                name: "Medium".to_string(),
                value: Length { value: 768.0 },
            },
        );
        let json = serde_json::to_string(&breakpoints).unwrap();
        let loaded: BreakpointsMap = serde_json::from_str(&json).unwrap();
        assert_eq!(breakpoints, loaded);
    }

    #[test]
    fn test_token_maps_are_ordered_by_id() {
        let mut colors = ColorsMap::new();
        colors.insert("z".to_string(), ColorDefinition { name: "Z".to_string(), value: "#000000".to_string() });
        colors.insert("a".to_string(), ColorDefinition { name: "A".to_string(), value: "#FFFFFF".to_string() });
        let ids: Vec<&str> = colors.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["a", "z"]);
    }
}
