//! Shared-ownership alias.
//!
//! The canvas is single-threaded: the render host is shared between the
//! canvas and live gesture overlays through `Rc<RefCell<T>>`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diagramkit_core::types::*;
//!
//! // Instead of: Rc<RefCell<HeadlessHost>>
//! let host: Shared<HeadlessHost> = shared(HeadlessHost::default());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// Used for the render host, which the canvas and live gesture overlays
/// both need to reach.
///
/// # Example
/// ```rust,ignore
/// let host: Shared<HeadlessHost> = shared(HeadlessHost::default());
/// host.borrow_mut().add_child(container);
/// ```
pub type Shared<T> = Rc<RefCell<T>>;

/// Create a new `Shared<T>` from a value.
///
/// # Example
/// ```rust,ignore
/// let host = shared(HeadlessHost::default());
/// ```
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
