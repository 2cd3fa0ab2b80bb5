//! Object categories and the typed handle wrappers.
//!
//! Every wrapper is a [`Handle`] with a fixed [`ObjectKind`]. The kind is the
//! only thing that differs between them: it picks the close routine run when
//! the last reference is dropped.

use core::fmt;

use crate::error::ErrorDomain;
use crate::handle::Handle;
use crate::library::{CallFailed, Library};
use crate::Hid;

/// Category of a library object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// An open file.
    File,
    /// A group.
    Group,
    /// A dataset.
    DataSet,
    /// A dataspace.
    DataSpace,
    /// An attribute.
    Attribute,
    /// A datatype.
    Datatype,
}

impl ObjectKind {
    /// All categories.
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::File,
        ObjectKind::Group,
        ObjectKind::DataSet,
        ObjectKind::DataSpace,
        ObjectKind::Attribute,
        ObjectKind::Datatype,
    ];

    /// Run the close routine for this category on `id`.
    pub fn close(self, library: &dyn Library, id: Hid) -> Result<(), CallFailed> {
        match self {
            ObjectKind::File => library.close_file(id),
            ObjectKind::Group => library.close_group(id),
            ObjectKind::DataSet => library.close_dataset(id),
            ObjectKind::DataSpace => library.close_dataspace(id),
            ObjectKind::Attribute => library.close_attribute(id),
            ObjectKind::Datatype => library.close_datatype(id),
        }
    }

    /// Error domain for failures of calls on this category.
    pub fn domain(self) -> ErrorDomain {
        match self {
            ObjectKind::File => ErrorDomain::File,
            ObjectKind::DataSet => ErrorDomain::DataSet,
            ObjectKind::DataSpace => ErrorDomain::DataSpace,
            ObjectKind::Group | ObjectKind::Attribute | ObjectKind::Datatype => {
                ErrorDomain::Object
            }
        }
    }

    /// Lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::File => "file",
            ObjectKind::Group => "group",
            ObjectKind::DataSet => "dataset",
            ObjectKind::DataSpace => "dataspace",
            ObjectKind::Attribute => "attribute",
            ObjectKind::Datatype => "datatype",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed handle.
pub trait Object {
    /// Category of every identifier held by this type.
    const KIND: ObjectKind;

    /// The underlying handle.
    fn handle(&self) -> &Handle;

    /// See [`Handle::is_valid`].
    fn is_valid(&self) -> bool {
        self.handle().is_valid()
    }

    /// See [`Handle::id`].
    fn id(&self) -> Hid {
        self.handle().id()
    }
}

/// Objects other objects can be opened or created under.
pub trait Location: Object {}

macro_rules! define_object {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            handle: $crate::handle::Handle,
        }

        impl $name {
            /// Bind an identifier returned by a successful open/create call.
            ///
            /// Takes over one library reference. On error the identifier is
            /// left untouched.
            pub fn from_id(session: &$crate::Session, id: $crate::Hid) -> $crate::Result<Self> {
                $crate::handle::Handle::from_id(session, $kind, id).map(|handle| Self { handle })
            }

            /// Another handle to the same identifier.
            pub fn try_clone(&self) -> $crate::Result<Self> {
                self.handle.try_clone().map(|handle| Self { handle })
            }

            /// Unwrap into the untyped handle.
            pub fn into_handle(self) -> $crate::handle::Handle {
                self.handle
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    handle: $crate::handle::Handle::invalid($kind),
                }
            }
        }

        impl core::ops::Deref for $name {
            type Target = $crate::handle::Handle;

            fn deref(&self) -> &Self::Target {
                &self.handle
            }
        }

        impl $crate::object::Object for $name {
            const KIND: $crate::object::ObjectKind = $kind;

            fn handle(&self) -> &$crate::handle::Handle {
                &self.handle
            }
        }
    };
}

pub(crate) use define_object;

define_object! {
    /// An attribute identifier.
    Attribute => ObjectKind::Attribute
}

define_object! {
    /// A datatype identifier.
    Datatype => ObjectKind::Datatype
}
