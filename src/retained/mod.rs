//! Retained state registry tree.
//!
//! Values that must survive a scope being torn down and recreated (a screen
//! leaving and re-entering the back stack, a window being rebuilt) live in a
//! tree of registries:
//!
//! ```text
//! root registry
//!   ├─ scope "record-a"  ──→ child registry (values of screen A)
//!   └─ scope "record-b"  ──→ child registry (values of screen B)
//! ```
//!
//! When a scope exits, its [`CanRetainChecker`] decides whether the child's
//! snapshot is kept in the parent or dropped. Registries are always passed
//! explicitly; there is no ambient "current registry".

mod cell;
mod checker;
mod registry;
mod scope;
mod value;

pub use cell::{remember_retained, remember_retained_here, RetainedCell};
pub use checker::{CanRetainChecker, RetainPolicy};
pub use registry::{Entry, RetainedStateRegistry};
pub use scope::RetainedScope;
pub use value::{RetainedValue, RetainedValueProvider, SavedState};
