use super::screen::Screen;

/// A back stack entry: a screen plus a key that is stable for the entry's lifetime.
///
/// Two records for the same screen are different records; the key is what
/// retained state and result delivery are bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<S: Screen> {
    screen: S,
    key: String,
}

impl<S: Screen> Record<S> {
    /// Create a record with a freshly generated key.
    pub fn new(screen: S) -> Self {
        Self {
            screen,
            key: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Create a record with an explicit key, e.g. when rebuilding a persisted stack.
    pub fn with_key(screen: S, key: impl Into<String>) -> Self {
        Self {
            screen,
            key: key.into(),
        }
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn into_screen(self) -> S {
        self.screen
    }
}
