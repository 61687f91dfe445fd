//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: The `Shared<T>` alias for `Rc<RefCell<T>>`.

pub mod aliases;

pub use aliases::*;
