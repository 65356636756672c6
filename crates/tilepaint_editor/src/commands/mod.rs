//! Undo/redo history and keyboard shortcuts
//!
//! Every map mutation reports one [`Change`] to a [`ChangeObserver`]. The
//! [`CommandHistory`] resource is the observer used by the editor: it keeps
//! the changes in order with a cursor at the last applied one.

mod shortcuts;

pub use shortcuts::*;

use crate::project::Project;
use bevy::prelude::Resource;
use tilepaint_core::{Change, TilemapError};
use uuid::Uuid;

/// Default number of actions kept before the oldest are pruned
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Receives the before/after delta of every mutation that changed the map
pub trait ChangeObserver {
    fn record(&mut self, change: Change);
}

impl ChangeObserver for Vec<Change> {
    fn record(&mut self, change: Change) {
        self.push(change);
    }
}

/// Linear undo/redo stack.
///
/// `actions[..applied]` are applied to the project, `actions[applied..]` were
/// undone and can be redone. Undo and redo always move by one whole action.
#[derive(Debug, Clone, Resource)]
pub struct CommandHistory {
    actions: Vec<Change>,
    applied: usize,
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl ChangeObserver for CommandHistory {
    fn record(&mut self, change: Change) {
        self.push(change);
    }
}

impl CommandHistory {
    /// Create a history keeping at most `limit` actions (at least one)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            actions: Vec::new(),
            applied: 0,
            limit: limit.max(1),
        }
    }

    /// Record a new action, discarding everything that was undone
    pub fn push(&mut self, change: Change) {
        if change.is_empty() {
            return;
        }
        self.actions.truncate(self.applied);
        self.actions.push(change);
        self.applied = self.actions.len();
        self.prune();
    }

    /// Roll the project back by one action.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. On `Err` neither
    /// the project nor the cursor moved.
    pub fn undo(&mut self, project: &mut Project) -> Result<bool, TilemapError> {
        let Some(change) = self.last_applied() else {
            return Ok(false);
        };
        project.apply_history_entry(&change.prev)?;
        self.retreat();
        bevy::log::debug!("Undo: {} cell(s) restored", change.len());
        Ok(true)
    }

    /// Reapply the most recently undone action
    pub fn redo(&mut self, project: &mut Project) -> Result<bool, TilemapError> {
        let Some(change) = self.next_undone() else {
            return Ok(false);
        };
        project.apply_history_entry(&change.next)?;
        self.advance();
        bevy::log::debug!("Redo: {} cell(s) reapplied", change.len());
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.actions.len()
    }

    pub fn undo_count(&self) -> usize {
        self.applied
    }

    pub fn redo_count(&self) -> usize {
        self.actions.len() - self.applied
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Change the limit, pruning the oldest actions if needed
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.prune();
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.applied = 0;
    }

    /// Forget every action recorded on `layer`, e.g. after the layer was removed
    pub fn discard_layer(&mut self, layer: Uuid) {
        let applied_removed = self.actions[..self.applied]
            .iter()
            .filter(|c| c.layer() == layer)
            .count();
        self.actions.retain(|c| c.layer() != layer);
        self.applied -= applied_removed;
    }

    fn last_applied(&self) -> Option<Change> {
        self.applied
            .checked_sub(1)
            .and_then(|i| self.actions.get(i))
            .cloned()
    }

    fn next_undone(&self) -> Option<Change> {
        self.actions.get(self.applied).cloned()
    }

    /// Move the cursor one whole action back
    fn retreat(&mut self) {
        self.applied = self.applied.saturating_sub(1);
    }

    /// Move the cursor one whole action forward
    fn advance(&mut self) {
        self.applied = (self.applied + 1).min(self.actions.len());
    }

    fn prune(&mut self) {
        if self.actions.len() > self.limit {
            let excess = self.actions.len() - self.limit;
            self.actions.drain(..excess);
            self.applied = self.applied.saturating_sub(excess);
        }
    }
}
