//! Group handles.

use crate::error::{ErrorDomain, Result};
use crate::object::{define_object, Location, Object, ObjectKind};

define_object! {
    /// A group.
    Group => ObjectKind::Group
}

impl Location for Group {}

impl Group {
    /// Create a group named `name` under `loc`.
    pub fn create<L: Location>(loc: &L, name: &str) -> Result<Self> {
        let session = loc.handle().bound_session()?;
        let outcome = session.library().create_group(loc.id(), name);
        let id = session.check(outcome, ErrorDomain::Object, || {
            format!("Unable to create group {name}")
        })?;
        Self::from_id(session, id)
    }

    /// Open the group named `name` under `loc`.
    pub fn open<L: Location>(loc: &L, name: &str) -> Result<Self> {
        let session = loc.handle().bound_session()?;
        let outcome = session.library().open_group(loc.id(), name);
        let id = session.check(outcome, ErrorDomain::Object, || {
            format!("Unable to open group {name}")
        })?;
        Self::from_id(session, id)
    }
}
