//! File handles.

use crate::error::{ErrorDomain, Result};
use crate::group::Group;
use crate::library::FileMode;
use crate::object::{define_object, Location, ObjectKind};
use crate::session::Session;

define_object! {
    /// An open file.
    File => ObjectKind::File
}

impl Location for File {}

impl File {
    /// Create a file at `path`.
    ///
    /// `mode` must be [`FileMode::Truncate`] or [`FileMode::Exclusive`].
    pub fn create(session: &Session, path: &str, mode: FileMode) -> Result<Self> {
        let outcome = session.library().create_file(path, mode);
        let id = session.check(outcome, ErrorDomain::File, || {
            format!("Unable to create file {path}")
        })?;
        Self::from_id(session, id)
    }

    /// Open an existing file at `path`.
    ///
    /// `mode` must be [`FileMode::ReadOnly`] or [`FileMode::ReadWrite`].
    pub fn open(session: &Session, path: &str, mode: FileMode) -> Result<Self> {
        let outcome = session.library().open_file(path, mode);
        let id = session.check(outcome, ErrorDomain::File, || {
            format!("Unable to open file {path}")
        })?;
        Self::from_id(session, id)
    }

    /// The root group.
    pub fn root(&self) -> Result<Group> {
        Group::open(self, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;
    use crate::memory::MemoryLibrary;
    use std::sync::Arc;

    #[test]
    fn open_missing_file_is_file_error() {
        let session = Session::new(MemoryLibrary::new());
        let err = File::open(&session, "missing.h5", FileMode::ReadOnly).unwrap_err();
        assert!(err.is(ErrorDomain::File));
        assert!(err.what().contains("missing.h5"));
        assert!(err
            .chain()
            .any(|e| e.err_minor() == codes::MINOR_CANTOPENFILE));
    }

    #[test]
    fn create_then_reopen() {
        let lib = Arc::new(MemoryLibrary::new());
        let session = Session::from_arc(lib.clone());
        let f = File::create(&session, "out.h5", FileMode::Exclusive).unwrap();
        assert!(f.is_valid());
        drop(f);
        assert!(lib.live_ids().is_empty());

        let err = File::create(&session, "out.h5", FileMode::Exclusive).unwrap_err();
        assert!(err.chain().any(|e| e.err_minor() == codes::MINOR_FILEEXISTS));

        let f = File::open(&session, "out.h5", FileMode::ReadWrite).unwrap();
        let root = f.root().unwrap();
        assert!(root.is_valid());
    }
}
