//! A library together with its properties and teardown side channel.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::{ErrorDomain, Exception, Result};
use crate::library::{CallFailed, Library};
use crate::mapper;
use crate::props::{SessionProps, TeardownPolicy};

struct Inner {
    library: Arc<dyn Library>,
    props: SessionProps,
    teardown_errors: Mutex<Vec<Exception>>,
}

/// Shared access to a [`Library`].
///
/// Cloning is cheap; every bound handle keeps a clone so the library
/// outlives the handles that reference it.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    /// Session over `library` with default properties.
    pub fn new(library: impl Library + 'static) -> Self {
        Self::from_arc(Arc::new(library))
    }

    /// Session over a shared library with default properties.
    pub fn from_arc(library: Arc<dyn Library>) -> Self {
        Self::with_props(library, SessionProps::default())
    }

    /// Session over a shared library with explicit properties.
    pub fn with_props(library: Arc<dyn Library>, props: SessionProps) -> Self {
        Self {
            inner: Arc::new(Inner {
                library,
                props,
                teardown_errors: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The underlying library.
    pub fn library(&self) -> &dyn Library {
        self.inner.library.as_ref()
    }

    /// Session properties.
    pub fn props(&self) -> &SessionProps {
        &self.inner.props
    }

    /// Map the library's current error stack into a chain tagged `domain`.
    pub fn map_error(&self, domain: ErrorDomain) -> Exception {
        mapper::map_error_stack(self.library(), domain, self.inner.props.clear_stack)
    }

    /// A `domain` exception with `context` as its message whose cause is
    /// the mapped error stack.
    ///
    /// With nothing on the stack (or a failed stack query) the result is a
    /// single generic [`UNKNOWN_ERROR`](mapper::UNKNOWN_ERROR) exception
    /// without a cause.
    pub fn failure(&self, domain: ErrorDomain, context: impl Into<String>) -> Exception {
        match mapper::stack_chain(self.library(), domain, self.inner.props.clear_stack) {
            Some(chain) => Exception::in_domain(domain, context).with_cause(chain),
            None => Exception::new(mapper::UNKNOWN_ERROR),
        }
    }

    /// Turn a failed library call into a [`failure`](Self::failure).
    ///
    /// `context` is only evaluated on failure.
    pub fn check<T, S>(
        &self,
        outcome: std::result::Result<T, CallFailed>,
        domain: ErrorDomain,
        context: impl FnOnce() -> S,
    ) -> Result<T>
    where
        S: Into<String>,
    {
        outcome.map_err(|_| self.failure(domain, context()))
    }

    /// Drain the exceptions recorded under [`TeardownPolicy::Record`].
    pub fn take_teardown_errors(&self) -> Vec<Exception> {
        let mut guard = self
            .inner
            .teardown_errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *guard)
    }

    pub(crate) fn report_teardown(&self, exc: Exception) {
        match self.inner.props.teardown {
            TeardownPolicy::Ignore => {}
            TeardownPolicy::Log => {
                tracing::warn!(error = %exc.full_message(), "handle teardown failed");
            }
            TeardownPolicy::Record => {
                tracing::warn!(error = %exc.full_message(), "handle teardown failed");
                self.inner
                    .teardown_errors
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(exc);
            }
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("backend", &self.library().name())
            .field("props", &self.inner.props)
            .finish()
    }
}
