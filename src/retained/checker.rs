/// Decides, at disposal time, whether a scope's state survives.
///
/// `true` means the teardown is reversible (the scope will come back, e.g.
/// its record is still in the back stack); `false` means it is final.
pub trait CanRetainChecker: Send + Sync {
    fn can_retain(&self) -> bool;
}

impl<F> CanRetainChecker for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn can_retain(&self) -> bool {
        self()
    }
}

/// Fixed answers for hosts that don't need a dynamic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetainPolicy {
    Always,
    Never,
}

impl CanRetainChecker for RetainPolicy {
    fn can_retain(&self) -> bool {
        matches!(self, RetainPolicy::Always)
    }
}
