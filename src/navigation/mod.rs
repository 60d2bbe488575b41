//! Back stack and navigator.
//!
//! ```text
//! Navigator::go_to / pop / reset_root
//!        │
//!        ▼
//! StackNavigator ──→ BackStack (records, saved stacks)
//!        │
//!        └──→ ResultHandler (pop results → waiting requesters)
//! ```

mod back_stack;
mod navigator;
mod record;
mod results;
mod screen;

pub use back_stack::BackStack;
pub use navigator::{Navigator, SharedBackStack, StackNavigator};
pub use record::Record;
pub use results::ResultHandler;
pub use screen::{PopResult, Screen, StateOptions};
