//! The action log and replay-based undo.
//!
//! The log is the single source of truth: the current document is always a
//! pure fold of the log over `Project::default()`. Undo does not roll back
//! to a cached snapshot — it drops the newest action and replays what
//! remains from scratch. That recomputation is O(log length), a deliberate
//! trade: no snapshot stack to keep in sync, and logs are bounded by a
//! single editing session. Redo is not a primitive; the host keeps undone
//! actions and reapplies them with [`apply_many`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::actions::Action;
use crate::app::error::Result;
use crate::app::services::processor;
use crate::app::state::Project;

/// Ordered log of applied actions, append-only except for [`undo`].
///
/// Owned by the host and passed into every engine call; the engine keeps
/// no hidden copy of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionLog {
    actions: Vec<Action>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

/// Fold one action into the state and append it to the log.
///
/// The action is appended only after the processor accepts it: a failing
/// action leaves both the log and the state untouched.
pub fn apply(log: &mut ActionLog, action: Action, state: &Project) -> Result<Project> {
    let next = processor::apply_action(&action, state)?;
    debug!(action = action.kind(), log_len = log.len() + 1, "applied action");
    log.actions.push(action);
    Ok(next)
}

/// Apply a batch in order. Atomic: nothing is appended unless every action
/// applies. This is how the host redoes previously undone actions.
pub fn apply_many(log: &mut ActionLog, actions: Vec<Action>, state: &Project) -> Result<Project> {
    let mut next = state.clone();
    for action in &actions {
        next = processor::apply_action(action, &next)?;
    }
    debug!(count = actions.len(), log_len = log.len() + actions.len(), "applied action batch");
    log.actions.extend(actions);
    Ok(next)
}

/// Drop the most recent action and rebuild the state by replaying the
/// remaining log from the canonical default project. Undoing an empty log
/// yields the default project.
///
/// The dropped action is gone from the log; redo only happens if the
/// caller kept it and reapplies it.
pub fn undo(log: &mut ActionLog) -> Result<Project> {
    let dropped = log.actions.pop();
    debug!(
        dropped = dropped.as_ref().map(Action::kind).unwrap_or("none"),
        log_len = log.len(),
        "undo"
    );
    replay(log)
}

/// Fold the processor over the whole log, starting from the default
/// project. This is the definition of "current state".
pub fn replay(log: &ActionLog) -> Result<Project> {
    let mut state = Project::default();
    for action in &log.actions {
        state = processor::apply_action(action, &state)?;
    }
    Ok(state)
}
