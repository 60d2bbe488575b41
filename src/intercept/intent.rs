use std::fmt;

use crate::navigation::{PopResult, StateOptions};

/// A navigation request before it reaches the navigator.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationIntent<S> {
    GoTo(S),
    Pop(Option<PopResult>),
    ResetRoot { new_root: S, options: StateOptions },
}

impl<S> NavigationIntent<S> {
    pub fn reset_root(new_root: S, options: StateOptions) -> Self {
        Self::ResetRoot { new_root, options }
    }

    pub fn kind(&self) -> IntentKind {
        match self {
            Self::GoTo(_) => IntentKind::GoTo,
            Self::Pop(_) => IntentKind::Pop,
            Self::ResetRoot { .. } => IntentKind::ResetRoot,
        }
    }
}

/// Intent discriminant, used for logging and failure routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    GoTo,
    Pop,
    ResetRoot,
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntentKind::GoTo => "go_to",
            IntentKind::Pop => "pop",
            IntentKind::ResetRoot => "reset_root",
        };
        f.write_str(name)
    }
}
