//! Chained exceptions built from the library error stack.
//!
//! An [`Exception`] is one node of a singly-linked chain. The head is the
//! most recent failure; [`Exception::next_exception`] walks towards the root
//! cause. Every node carries the major/minor codes the library attached to
//! the corresponding error-stack frame, or zero when the node was built
//! directly.

use core::fmt;

use crate::Hid;

/// API category a failure belongs to.
///
/// The domain is chosen by the call site, not inferred from the error
/// stack. Matching on it is how callers handle one category of failure
/// (say, retry on [`ErrorDomain::File`]) while letting others propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorDomain {
    /// Unmapped or unknown failure.
    Generic,
    /// Identifier and reference-count failures.
    Object,
    /// File open/create/close failures.
    File,
    /// Dataspace failures.
    DataSpace,
    /// Dataset failures.
    DataSet,
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorDomain::Generic => "generic",
            ErrorDomain::Object => "object",
            ErrorDomain::File => "file",
            ErrorDomain::DataSpace => "dataspace",
            ErrorDomain::DataSet => "dataset",
        };
        f.write_str(name)
    }
}

/// A failure reported by the library, optionally chained to its cause.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Exception {
    domain: ErrorDomain,
    message: String,
    err_major: Hid,
    err_minor: Hid,
    #[source]
    next: Option<Box<Exception>>,
}

impl Exception {
    /// Create a standalone generic exception with unmapped codes.
    pub fn new(message: impl Into<String>) -> Self {
        Self::in_domain(ErrorDomain::Generic, message)
    }

    /// Create a standalone exception tagged with `domain`.
    pub fn in_domain(domain: ErrorDomain, message: impl Into<String>) -> Self {
        Self {
            domain,
            message: message.into(),
            err_major: 0,
            err_minor: 0,
            next: None,
        }
    }

    /// Identifier or reference-count failure.
    pub fn object(message: impl Into<String>) -> Self {
        Self::in_domain(ErrorDomain::Object, message)
    }

    /// File-layer failure.
    pub fn file(message: impl Into<String>) -> Self {
        Self::in_domain(ErrorDomain::File, message)
    }

    /// Dataspace-layer failure.
    pub fn dataspace(message: impl Into<String>) -> Self {
        Self::in_domain(ErrorDomain::DataSpace, message)
    }

    /// Dataset-layer failure.
    pub fn dataset(message: impl Into<String>) -> Self {
        Self::in_domain(ErrorDomain::DataSet, message)
    }

    pub(crate) fn with_codes(mut self, major: Hid, minor: Hid) -> Self {
        self.err_major = major;
        self.err_minor = minor;
        self
    }

    /// Attach `cause` as the next node, replacing any existing chain.
    ///
    /// Used to put a call-site message in front of a mapped error stack.
    pub fn with_cause(mut self, cause: Exception) -> Self {
        self.next = Some(Box::new(cause));
        self
    }

    /// The message of this node only.
    #[inline]
    pub fn what(&self) -> &str {
        &self.message
    }

    /// Replace the message of this node.
    pub fn set_error_msg(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// Next (older) node in the chain, if any.
    #[inline]
    pub fn next_exception(&self) -> Option<&Exception> {
        self.next.as_deref()
    }

    /// Library major error code; zero when unmapped.
    #[inline]
    pub fn err_major(&self) -> Hid {
        self.err_major
    }

    /// Library minor error code; zero when unmapped.
    #[inline]
    pub fn err_minor(&self) -> Hid {
        self.err_minor
    }

    /// Domain this node was raised in.
    #[inline]
    pub fn domain(&self) -> ErrorDomain {
        self.domain
    }

    /// Shorthand for `self.domain() == domain`.
    pub fn is(&self, domain: ErrorDomain) -> bool {
        self.domain == domain
    }

    /// Iterate the chain starting with this node.
    pub fn chain(&self) -> Chain<'_> {
        Chain { cur: Some(self) }
    }

    /// The last node of the chain (the earliest recorded failure).
    pub fn root_cause(&self) -> &Exception {
        let mut cur = self;
        while let Some(next) = cur.next_exception() {
            cur = next;
        }
        cur
    }

    /// Every message in the chain joined with `": "`, head first.
    pub fn full_message(&self) -> String {
        self.chain().map(Exception::what).collect::<Vec<_>>().join(": ")
    }
}

/// Iterator over an exception chain, head first.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    cur: Option<&'a Exception>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Exception;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.cur?;
        self.cur = cur.next_exception();
        Some(cur)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Exception>;
