//! Services layer - business operations over the document.
//!
//! This module contains the engine's operations:
//! - Immutable layer-tree editing
//! - Drag-and-drop geometry resolution
//! - The pure action processor
//! - The history log and replay-based undo

pub mod drag;
pub mod history;
pub mod processor;
pub mod tree_ops;
