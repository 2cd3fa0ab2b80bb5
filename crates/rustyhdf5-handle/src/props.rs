//! Session properties.
//!
//! Groups the knobs that govern how handles bind, how error stacks are
//! consumed, and what happens to failures during teardown.

/// What to do with a failure raised while a handle is dropped.
///
/// Drop cannot return an error, so teardown failures go through this side
/// channel instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TeardownPolicy {
    /// Absorb the failure silently.
    Ignore,
    /// Emit a `tracing` warning with the mapped error chain.
    #[default]
    Log,
    /// Log, and keep the exception for
    /// [`Session::take_teardown_errors`](crate::Session::take_teardown_errors).
    Record,
}

/// Session properties.
#[derive(Debug, Clone)]
pub struct SessionProps {
    /// Teardown failure handling.
    pub teardown: TeardownPolicy,
    /// Clear the library error stack after it has been mapped.
    pub clear_stack: bool,
    /// Check the library's category for an identifier when binding it.
    pub verify_kind: bool,
}

impl Default for SessionProps {
    fn default() -> Self {
        Self {
            teardown: TeardownPolicy::Log,
            clear_stack: true,
            verify_kind: true,
        }
    }
}

impl SessionProps {
    /// Create default session properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the teardown policy.
    pub fn teardown(mut self, policy: TeardownPolicy) -> Self {
        self.teardown = policy;
        self
    }

    /// Leave the error stack in place after mapping.
    pub fn keep_stack(mut self) -> Self {
        self.clear_stack = false;
        self
    }

    /// Skip the category check when binding identifiers.
    pub fn skip_kind_check(mut self) -> Self {
        self.verify_kind = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = SessionProps::new();
        assert_eq!(p.teardown, TeardownPolicy::Log);
        assert!(p.clear_stack);
        assert!(p.verify_kind);
    }

    #[test]
    fn builder_chain() {
        let p = SessionProps::new()
            .teardown(TeardownPolicy::Record)
            .keep_stack()
            .skip_kind_check();
        assert_eq!(p.teardown, TeardownPolicy::Record);
        assert!(!p.clear_stack);
        assert!(!p.verify_kind);
    }
}
