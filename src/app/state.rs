use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::app::domain::{
    BindingMap, BreakpointDefinition, BreakpointsMap, ColorDefinition, ColorsMap, Component,
    ComponentLayer, ContainerLayer, Dimensions, FlexDirection, FontFamiliesMap,
    FontFamilyDefinition, FontSizeDefinition, FontSizesMap, Layer, LayerType, Length, Margin,
    Padding, Ref, TextAlign, TextLayer, TextStyle, TextTag,
};
use crate::app::error::{EngineError, Result};

/// Stable id of the component every new project starts with.
pub const DEFAULT_COMPONENT_ID: &str = "default-component";

const DEFAULT_FONT_SIZE_ID: &str = "font-size-md";
const DEFAULT_FONT_FAMILY_ID: &str = "font-family-sans";

/// The aggregate document state.
///
/// The current state is always reproducible by folding the action log over
/// `Project::default()`; nothing here mutates outside the processor except
/// the save bookkeeping (`mark_saved`), which is transient UI state.
/// `selected_layer_id`, `file_name`, and `is_saved` are transient too but
/// travel with the document so that replay reproduces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_layer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default = "default_is_saved")]
    pub is_saved: bool,
    #[serde(default)]
    pub colors: ColorsMap,
    #[serde(default)]
    pub font_sizes: FontSizesMap,
    #[serde(default)]
    pub font_families: FontFamiliesMap,
    #[serde(default)]
    pub breakpoints: BreakpointsMap,
    #[serde(default)]
    pub components: BTreeMap<String, Component>,
}

fn default_is_saved() -> bool {
    true
}

impl Default for Project {
    /// The canonical empty project: default token sets and one implicit
    /// component with no layout. Replay starts from here.
    fn default() -> Self {
        Self {
            selected_layer_id: None,
            file_name: None,
            is_saved: true,
            colors: default_colors(),
            font_sizes: default_font_sizes(),
            font_families: default_font_families(),
            breakpoints: default_breakpoints(),
            components: BTreeMap::from([(
                DEFAULT_COMPONENT_ID.to_string(),
                Component::new("Default component"),
            )]),
        }
    }
}

impl Project {
    pub fn component(&self, id: &str) -> Result<&Component> {
        self.components
            .get(id)
            .ok_or_else(|| EngineError::NotFound(format!("component {id}")))
    }

    pub fn component_mut(&mut self, id: &str) -> Result<&mut Component> {
        self.components
            .get_mut(id)
            .ok_or_else(|| EngineError::NotFound(format!("component {id}")))
    }

    /// True if any layer of any component carries this id. Layer ids are
    /// unique document-wide, not per component.
    pub fn layer_id_exists(&self, id: &str) -> bool {
        self.components.values().any(|component| {
            component
                .layout
                .as_ref()
                .is_some_and(|root| root.subtree_ids().contains(&id))
        })
    }

    /// Every layer id in the document.
    pub fn all_layer_ids(&self) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        for component in self.components.values() {
            if let Some(root) = &component.layout {
                root.visit(&mut |layer| {
                    ids.insert(layer.id().to_string());
                });
            }
        }
        ids
    }

    /// Host-facing bookkeeping after a successful save. Deliberately not an
    /// action: saving derives from the state, it does not change the
    /// document.
    pub fn mark_saved(&mut self, file_name: impl Into<String>) {
        self.file_name = Some(file_name.into());
        self.is_saved = true;
    }

    pub(crate) fn touch(&mut self) {
        self.is_saved = false;
    }

    /// Build a layer of the given kind with canonical default styling.
    ///
    /// Ids are supplied by the caller so that actions stay replayable.
    /// Component instances require `source_component_id`, which must name
    /// an existing component.
    pub fn make_layer(
        &self,
        kind: LayerType,
        id: &str,
        source_component_id: Option<&str>,
    ) -> Result<Layer> {
        match kind {
            LayerType::Container => Ok(Layer::Container(ContainerLayer {
                id: id.to_string(),
                name: "Container".to_string(),
                flex_direction: FlexDirection::Column,
                background_color: None,
                dimensions: Dimensions::default(),
                children: Vec::new(),
            })),
            LayerType::Text => Ok(Layer::Text(TextLayer {
                id: id.to_string(),
                name: "Text".to_string(),
                tag: TextTag::P,
                text: "Text".to_string(),
                style: self.default_text_style(),
                media_queries: Vec::new(),
                bindings: BindingMap::new(),
            })),
            LayerType::Component => {
                let source_id = source_component_id.ok_or_else(|| {
                    EngineError::InvalidArgument(
                        "component layers need a source component id".to_string(),
                    )
                })?;
                let source = self.component(source_id)?;
                Ok(Layer::Component(ComponentLayer {
                    id: id.to_string(),
                    name: source.name.clone(),
                    component_id: source_id.to_string(),
                    props: BTreeMap::new(),
                    bindings: BindingMap::new(),
                }))
            }
        }
    }

    fn default_text_style(&self) -> TextStyle {
        TextStyle {
            line_height: 1.5,
            letter_spacing: None,
            color: None,
            font_size: preferred_ref(&self.font_sizes, DEFAULT_FONT_SIZE_ID),
            font_family: preferred_ref(&self.font_families, DEFAULT_FONT_FAMILY_ID),
            text_align: TextAlign::Left,
            background_color: None,
            dimensions: Dimensions::default(),
            margin: Margin::default(),
            padding: Padding::default(),
        }
    }
}

/// Pick `preferred` if the token map has it, otherwise the first token.
/// A project bootstrapped with no tokens at all yields a dangling ref,
/// which renders with a fallback.
fn preferred_ref<V>(map: &BTreeMap<String, V>, preferred: &str) -> Ref {
    if map.contains_key(preferred) {
        Ref::new(preferred)
    } else if let Some(first) = map.keys().next() {
        Ref::new(first.clone())
    } else {
        Ref::new("")
    }
}

fn default_colors() -> ColorsMap {
    BTreeMap::from([
        (
            "color-black".to_string(),
            ColorDefinition { name: "Black".to_string(), value: "#24292E".to_string() },
        ),
        (
            "color-white".to_string(),
            ColorDefinition { name: "White".to_string(), value: "#FFFFFF".to_string() },
        ),
        (
            "color-primary".to_string(),
            ColorDefinition { name: "Primary".to_string(), value: "#0366D6".to_string() },
        ),
    ])
}

fn default_font_sizes() -> FontSizesMap {
    BTreeMap::from([
        (
            "font-size-sm".to_string(),
            FontSizeDefinition { name: "Small".to_string(), value: "14px".to_string() },
        ),
        (
            DEFAULT_FONT_SIZE_ID.to_string(),
            FontSizeDefinition { name: "Medium".to_string(), value: "16px".to_string() },
        ),
        (
            "font-size-lg".to_string(),
            FontSizeDefinition { name: "Large".to_string(), value: "20px".to_string() },
        ),
    ])
}

fn default_font_families() -> FontFamiliesMap {
    BTreeMap::from([
        (
            DEFAULT_FONT_FAMILY_ID.to_string(),
            FontFamilyDefinition {
                name: "Sans".to_string(),
                value: "-apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif"
                    .to_string(),
            },
        ),
        (
            "font-family-mono".to_string(),
            FontFamilyDefinition {
                name: "Mono".to_string(),
                value: "'SFMono-Regular', Consolas, 'Liberation Mono', Menlo, monospace"
                    .to_string(),
            },
        ),
    ])
}

fn default_breakpoints() -> BreakpointsMap {
    BTreeMap::from([
        (
            "breakpoint-sm".to_string(),
            BreakpointDefinition { name: "Small".to_string(), value: Length { value: 544.0 } },
        ),
        (
            "breakpoint-md".to_string(),
            BreakpointDefinition { name: "Medium".to_string(), value: Length { value: 768.0 } },
        ),
        (
            "breakpoint-lg".to_string(),
            BreakpointDefinition { name: "Large".to_string(), value: Length { value: 1012.0 } },
        ),
        (
            "breakpoint-xl".to_string(),
            BreakpointDefinition {
                name: "Extra large".to_string(),
                value: Length { value: 1280.0 },
            },
        ),
    ])
}
