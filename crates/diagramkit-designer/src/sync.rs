//! Selection synchronization guard.
//!
//! Selection flows both ways between the selection set and container
//! flags. While one direction is being applied the other must not react, or
//! each update would bounce back. A [`SyncGuard`] marks the active pass; the
//! pass ends when its [`SyncPass`] is dropped, on every exit path.

use std::cell::Cell;
use std::rc::Rc;

use diagramkit_core::{CanvasError, Result};

/// Reentrancy flag shared by the canvas and its passes.
#[derive(Debug, Clone, Default)]
pub struct SyncGuard {
    active: Rc<Cell<bool>>,
}

impl SyncGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a pass.
    ///
    /// # Errors
    ///
    /// [`CanvasError::ReentrantSynchronization`] if a pass is already active.
    pub fn enter(&self) -> Result<SyncPass> {
        if self.active.replace(true) {
            return Err(CanvasError::ReentrantSynchronization);
        }
        Ok(SyncPass {
            active: Rc::clone(&self.active),
        })
    }

    /// True while a pass is active; notifications should be ignored.
    pub fn is_synchronizing(&self) -> bool {
        self.active.get()
    }
}

/// An active synchronization pass. Dropping it ends the pass.
#[derive(Debug)]
#[must_use = "the pass ends as soon as it is dropped"]
pub struct SyncPass {
    active: Rc<Cell<bool>>,
}

impl Drop for SyncPass {
    fn drop(&mut self) {
        self.active.set(false);
    }
}
