//! The seam between handles and the storage library.
//!
//! [`Library`] lists every primitive this crate consumes: reference counting,
//! one close routine per object category, the error-stack query, and the few
//! open/create calls the collaborator layer needs to bind handles.
//!
//! ```text
//! ┌───────────────────────────────┐
//! │ Handle / File / Group / ...   │
//! ├───────────────────────────────┤
//! │   Library                     │  ← trait defined here
//! ├───────────────┬───────────────┤
//! │ MemoryLibrary │ NativeLibrary │
//! └───────────────┴───────────────┘
//! ```
//!
//! Primitives report failure with [`CallFailed`]; the details of a failure
//! live on the library's error stack and are read back through
//! [`Library::error_stack`].

use core::fmt;

use crate::object::ObjectKind;
use crate::Hid;

/// A library primitive reported failure.
///
/// Carries no payload: the reason is on the library error stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFailed;

impl fmt::Display for CallFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("library call failed")
    }
}

impl std::error::Error for CallFailed {}

/// One entry of the library error stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorFrame {
    /// Description pushed with the frame.
    pub description: String,
    /// Major (category) code.
    pub major: Hid,
    /// Minor (detail) code.
    pub minor: Hid,
    /// Text associated with `major`.
    pub major_message: String,
    /// Text associated with `minor`.
    pub minor_message: String,
    /// Library function that pushed the frame.
    pub function: String,
    /// Source file of that function.
    pub file: String,
    /// Source line of that function.
    pub line: u32,
}

impl ErrorFrame {
    /// Frame with codes and a description; location fields empty.
    pub fn new(major: Hid, minor: Hid, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            major,
            minor,
            major_message: String::new(),
            minor_message: String::new(),
            function: String::new(),
            file: String::new(),
            line: 0,
        }
    }

    /// Set the pushing function.
    pub fn in_function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    /// Set the code texts.
    pub fn with_messages(
        mut self,
        major_message: impl Into<String>,
        minor_message: impl Into<String>,
    ) -> Self {
        self.major_message = major_message.into();
        self.minor_message = minor_message.into();
        self
    }
}

impl fmt::Display for ErrorFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.function.is_empty() {
            write!(f, "{}(): ", self.function)?;
        }
        f.write_str(&self.description)?;
        if !self.major_message.is_empty() || !self.minor_message.is_empty() {
            write!(f, " ({}: {})", self.major_message, self.minor_message)?;
        }
        Ok(())
    }
}

/// How a file is opened or created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Open an existing file read-only.
    ReadOnly,
    /// Open an existing file for reading and writing.
    ReadWrite,
    /// Create, truncating any existing file.
    Truncate,
    /// Create, failing if the file exists.
    Exclusive,
}

/// Primitives consumed from the storage library.
///
/// Collaborator calls have default implementations that fail without
/// touching the error stack, so a backend only implements what it supports.
pub trait Library: Send + Sync {
    /// Backend name (e.g. "memory", "native").
    fn name(&self) -> &str;

    /// Whether the library still recognises `id`.
    fn is_valid(&self, id: Hid) -> bool;

    /// Category of `id`, if the library can tell.
    fn object_kind(&self, id: Hid) -> Option<ObjectKind>;

    /// Increment the reference count; returns the new count.
    fn inc_ref(&self, id: Hid) -> Result<u32, CallFailed>;

    /// Decrement the reference count; returns the new count.
    fn dec_ref(&self, id: Hid) -> Result<u32, CallFailed>;

    /// Current reference count.
    fn ref_count(&self, id: Hid) -> Result<u32, CallFailed>;

    /// Close a file identifier.
    fn close_file(&self, id: Hid) -> Result<(), CallFailed>;

    /// Close a group identifier.
    fn close_group(&self, id: Hid) -> Result<(), CallFailed>;

    /// Close a dataset identifier.
    fn close_dataset(&self, id: Hid) -> Result<(), CallFailed>;

    /// Close a dataspace identifier.
    fn close_dataspace(&self, id: Hid) -> Result<(), CallFailed>;

    /// Close an attribute identifier.
    fn close_attribute(&self, id: Hid) -> Result<(), CallFailed>;

    /// Close a datatype identifier.
    fn close_datatype(&self, id: Hid) -> Result<(), CallFailed>;

    /// Frames recorded on the current error stack, oldest first.
    fn error_stack(&self) -> Result<Vec<ErrorFrame>, CallFailed>;

    /// Drop every frame from the current error stack.
    fn clear_error_stack(&self);

    /// Create a file.
    fn create_file(&self, _path: &str, _mode: FileMode) -> Result<Hid, CallFailed> {
        Err(CallFailed)
    }

    /// Open an existing file.
    fn open_file(&self, _path: &str, _mode: FileMode) -> Result<Hid, CallFailed> {
        Err(CallFailed)
    }

    /// Create a group under `loc`.
    fn create_group(&self, _loc: Hid, _name: &str) -> Result<Hid, CallFailed> {
        Err(CallFailed)
    }

    /// Open a group under `loc`.
    fn open_group(&self, _loc: Hid, _name: &str) -> Result<Hid, CallFailed> {
        Err(CallFailed)
    }

    /// Create a simple dataspace with the given current dimensions.
    fn create_simple_dataspace(&self, _dims: &[u64]) -> Result<Hid, CallFailed> {
        Err(CallFailed)
    }

    /// Open a dataset under `loc`.
    fn open_dataset(&self, _loc: Hid, _name: &str) -> Result<Hid, CallFailed> {
        Err(CallFailed)
    }
}
