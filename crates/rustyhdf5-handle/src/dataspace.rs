//! Dataspace handles.

use crate::error::{ErrorDomain, Result};
use crate::object::{define_object, ObjectKind};
use crate::session::Session;

define_object! {
    /// A dataspace.
    DataSpace => ObjectKind::DataSpace
}

impl DataSpace {
    /// Create a simple dataspace with current dimensions `dims`.
    pub fn simple(session: &Session, dims: &[u64]) -> Result<Self> {
        let outcome = session.library().create_simple_dataspace(dims);
        let id = session.check(outcome, ErrorDomain::DataSpace, || {
            format!("Unable to create simple dataspace of rank {}", dims.len())
        })?;
        Self::from_id(session, id)
    }
}
