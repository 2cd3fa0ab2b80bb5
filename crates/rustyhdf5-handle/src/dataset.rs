//! Dataset handles.

use crate::error::{ErrorDomain, Result};
use crate::object::{define_object, Location, Object, ObjectKind};

define_object! {
    /// A dataset.
    DataSet => ObjectKind::DataSet
}

impl DataSet {
    /// Open the dataset named `name` under `loc`.
    pub fn open<L: Location>(loc: &L, name: &str) -> Result<Self> {
        let session = loc.handle().bound_session()?;
        let outcome = session.library().open_dataset(loc.id(), name);
        let id = session.check(outcome, ErrorDomain::DataSet, || {
            format!("Unable to open dataset {name}")
        })?;
        Self::from_id(session, id)
    }
}
