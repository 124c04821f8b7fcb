use serde::{Deserialize, Serialize};

use crate::app::domain::{
    BreakpointDefinition, ColorDefinition, FontFamilyDefinition, FontSizeDefinition, Layer,
    LayerType,
};
use crate::app::state::Project;

/// All actions that can be applied to a document.
/// Each UI gesture produces one of these; the processor folds them into the
/// document state and the history log records them.
///
/// An action is an atomic, serializable description of one mutation. It
/// carries only ids and values — never DOM events, pointer coordinates, or
/// other runtime objects — so that replaying the log always reproduces the
/// same state. Drag gestures are resolved into `MoveLayer` data *before*
/// the action is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    // Project
    InitProject {
        project: Box<Project>,
    },

    // Components
    AddComponent {
        component_id: String,
        name: String,
    },
    RenameComponent {
        component_id: String,
        name: String,
    },
    DeleteComponent {
        component_id: String,
    },

    // Layers
    AddLayer {
        component_id: String,
        layer_type: LayerType,
        layer_id: String,
        #[serde(default)]
        parent_layer_id: Option<String>,
        /// Required for component-instance layers: the instanced component.
        #[serde(default)]
        source_component_id: Option<String>,
    },
    RenameLayer {
        component_id: String,
        layer_id: String,
        name: String,
    },
    DeleteLayer {
        component_id: String,
        layer_id: String,
    },
    MoveLayer {
        component_id: String,
        layer_id: String,
        parent_id: String,
        position: usize,
    },
    UpdateLayer {
        component_id: String,
        layer: Box<Layer>,
    },
    SelectLayer {
        layer_id: Option<String>,
    },

    // Component props
    AddComponentProp {
        component_id: String,
        prop: String,
    },
    EditComponentProp {
        component_id: String,
        old_prop: String,
        new_prop: String,
    },
    DeleteComponentProp {
        component_id: String,
        prop: String,
    },

    // Component examples
    AddComponentExample {
        component_id: String,
        name: String,
    },
    DeleteComponentExample {
        component_id: String,
        name: String,
    },
    SetComponentExampleProp {
        component_id: String,
        example: String,
        prop: String,
        value: String,
    },

    // Design tokens
    SetColor {
        id: String,
        definition: ColorDefinition,
    },
    DeleteColor {
        id: String,
    },
    SetFontSize {
        id: String,
        definition: FontSizeDefinition,
    },
    DeleteFontSize {
        id: String,
    },
    SetFontFamily {
        id: String,
        definition: FontFamilyDefinition,
    },
    DeleteFontFamily {
        id: String,
    },
    SetBreakpoint {
        id: String,
        definition: BreakpointDefinition,
    },
    DeleteBreakpoint {
        id: String,
    },
}

impl Action {
    /// Short name used in debug logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::InitProject { .. } => "initProject",
            Action::AddComponent { .. } => "addComponent",
            Action::RenameComponent { .. } => "renameComponent",
            Action::DeleteComponent { .. } => "deleteComponent",
            Action::AddLayer { .. } => "addLayer",
            Action::RenameLayer { .. } => "renameLayer",
            Action::DeleteLayer { .. } => "deleteLayer",
            Action::MoveLayer { .. } => "moveLayer",
            Action::UpdateLayer { .. } => "updateLayer",
            Action::SelectLayer { .. } => "selectLayer",
            Action::AddComponentProp { .. } => "addComponentProp",
            Action::EditComponentProp { .. } => "editComponentProp",
            Action::DeleteComponentProp { .. } => "deleteComponentProp",
            Action::AddComponentExample { .. } => "addComponentExample",
            Action::DeleteComponentExample { .. } => "deleteComponentExample",
            Action::SetComponentExampleProp { .. } => "setComponentExampleProp",
            Action::SetColor { .. } => "setColor",
            Action::DeleteColor { .. } => "deleteColor",
            Action::SetFontSize { .. } => "setFontSize",
            Action::DeleteFontSize { .. } => "deleteFontSize",
            Action::SetFontFamily { .. } => "setFontFamily",
            Action::DeleteFontFamily { .. } => "deleteFontFamily",
            Action::SetBreakpoint { .. } => "setBreakpoint",
            Action::DeleteBreakpoint { .. } => "deleteBreakpoint",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serialization_round_trip() {
        let action = Action::AddLayer {
            component_id: "button".to_string(),
            layer_type: LayerType::Text,
            layer_id: "label-1".to_string(),
            parent_layer_id: Some("root-1".to_string()),
            source_component_id: None,
        };
        let json = serde_json::to_string(&action).unwrap();
        let loaded: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, loaded);
    }

    #[test]
    fn test_kind_names() {
        let action = Action::DeleteComponentProp {
            component_id: "card".to_string(),
            prop: "title".to_string(),
        };
        assert_eq!(action.kind(), "deleteComponentProp");
        assert_eq!(Action::SelectLayer { layer_id: None }.kind(), "selectLayer");
    }
}
