//! LayerStudio — the document state engine behind a visual UI builder.
//!
//! Users compose components out of nested layers (containers, text nodes,
//! and component instances) and edit them through direct manipulation. This
//! crate owns the parts with real invariants: the immutable layer-tree
//! algorithms, the drag geometry that maps pointer rows onto tree insertion
//! points, the pure action processor, and the replay-based undo log. Panel
//! rendering, pickers, and file dialogs live in the host and call in
//! through [`app::services::history`].

pub mod app;

pub use app::actions::Action;
pub use app::domain::{Component, Layer, LayerType};
pub use app::error::{EngineError, Result};
pub use app::services::history::ActionLog;
pub use app::state::Project;
