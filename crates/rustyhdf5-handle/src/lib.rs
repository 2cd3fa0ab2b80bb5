//! Reference-counted HDF5 identifier handles and chained library errors.
//!
//! HDF5 hands out integer identifiers for files, groups, datasets,
//! dataspaces, attributes and datatypes, and keeps a reference count for
//! each. This crate wraps those identifiers in [`Handle`]s that keep the
//! count exact across clones and drops, and turns the library's error stack
//! into a chain of [`Exception`]s at the moment a call fails.
//!
//! The library itself sits behind the [`Library`] trait. [`MemoryLibrary`]
//! is an in-process implementation; the `native` feature adds
//! `NativeLibrary`, which links the system libhdf5.
//!
//! # Example
//!
//! ```
//! use rustyhdf5_handle::{ErrorDomain, File, FileMode, MemoryLibrary, Session};
//!
//! let session = Session::new(MemoryLibrary::new());
//!
//! let err = File::open(&session, "missing.h5", FileMode::ReadOnly).unwrap_err();
//! assert_eq!(err.domain(), ErrorDomain::File);
//! for cause in err.chain() {
//!     println!("{} (major {}, minor {})", cause.what(), cause.err_major(), cause.err_minor());
//! }
//!
//! let file = File::create(&session, "new.h5", FileMode::Truncate).unwrap();
//! let shared = file.try_clone().unwrap();
//! drop(file);
//! assert!(shared.is_valid());
//! ```

pub mod codes;
pub mod dataset;
pub mod dataspace;
pub mod error;
pub mod file;
pub mod group;
pub mod handle;
pub mod library;
pub mod mapper;
pub mod memory;
#[cfg(feature = "native")]
pub mod native;
pub mod object;
pub mod props;
pub mod session;

pub use dataset::DataSet;
pub use dataspace::DataSpace;
pub use error::{Chain, ErrorDomain, Exception, Result};
pub use file::File;
pub use group::Group;
pub use handle::Handle;
pub use library::{CallFailed, ErrorFrame, FileMode, Library};
pub use mapper::{chain_from_frames, map_error_stack, UNKNOWN_ERROR};
pub use memory::{CallStats, FaultMode, MemoryLibrary, Op};
#[cfg(feature = "native")]
pub use native::NativeLibrary;
pub use object::{Attribute, Datatype, Location, Object, ObjectKind};
pub use props::{SessionProps, TeardownPolicy};
pub use session::Session;

/// Library identifier (`hid_t`).
pub type Hid = i64;

/// Identifier of an unbound handle.
pub const INVALID_HID: Hid = -1;
