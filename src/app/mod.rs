//! Engine layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Layer, Component, design tokens)
//! - `services/` - Business operations (tree editing, drag geometry,
//!   action processing, history/undo)
//! - `actions.rs` - Action types for the event system
//! - `state.rs` - Document state aggregate and canonical defaults
//! - `error.rs` - Engine error taxonomy

pub mod actions;
pub mod domain;
pub mod error;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use actions::Action;
pub use domain::{
    Binding, BreakpointDefinition, ColorDefinition, Component, ComponentExample, ComponentLayer,
    ContainerLayer, FontFamilyDefinition, FontSizeDefinition, Layer, LayerType, MediaQuery,
    PropDefinition, TextLayer, TextStyle,
};
pub use error::{EngineError, Result};
pub use services::drag::DropPosition;
pub use services::history::ActionLog;
pub use services::tree_ops::{FlatLayerItem, InsertPosition};
pub use state::{DEFAULT_COMPONENT_ID, Project};
