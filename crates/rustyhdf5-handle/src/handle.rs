//! Reference-counted ownership of one library identifier.
//!
//! The library keeps the reference count; a [`Handle`] only keeps it honest.
//! Every [`Handle::try_clone`] adds one reference and every drop of a bound
//! handle removes exactly one. Dropping the last reference runs the close
//! routine for the handle's [`ObjectKind`].
//!
//! A handle is either unbound (`id == INVALID_HID`, no session) or bound
//! (valid id, session present). Binding only happens through
//! [`Handle::from_id`] after a successful library call; there is no reset.

use core::fmt;

use crate::error::{ErrorDomain, Exception, Result};
use crate::object::ObjectKind;
use crate::session::Session;
use crate::{Hid, INVALID_HID};

/// Shared ownership of a library identifier.
pub struct Handle {
    id: Hid,
    kind: ObjectKind,
    session: Option<Session>,
}

impl Handle {
    /// An unbound handle. Makes no library call.
    pub const fn invalid(kind: ObjectKind) -> Self {
        Self {
            id: INVALID_HID,
            kind,
            session: None,
        }
    }

    /// Bind `id`, taking over one library reference.
    ///
    /// Fails with an object error for `INVALID_HID`, or when kind checking
    /// is enabled and the library files `id` under another category or
    /// cannot categorise a non-attribute `id`. The identifier is left
    /// untouched on failure.
    pub fn from_id(session: &Session, kind: ObjectKind, id: Hid) -> Result<Self> {
        if id == INVALID_HID {
            return Err(Exception::object(format!("cannot bind invalid {kind} identifier")));
        }
        if session.props().verify_kind {
            match session.library().object_kind(id) {
                Some(actual) if actual != kind => {
                    return Err(Exception::object(format!(
                        "identifier {id} is a {actual}, expected a {kind}"
                    )));
                }
                // Attributes are the one category a backend may not report.
                None if kind != ObjectKind::Attribute => {
                    return Err(Exception::object(format!(
                        "identifier {id} is not a known {kind}"
                    )));
                }
                _ => {}
            }
        }
        Ok(Self {
            id,
            kind,
            session: Some(session.clone()),
        })
    }

    /// `true` unless the identifier is the invalid sentinel.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.id != INVALID_HID
    }

    /// Raw identifier, unchecked.
    #[inline]
    pub fn id(&self) -> Hid {
        self.id
    }

    /// Category of this handle.
    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Session of a bound handle.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Bound, and the library still recognises the identifier.
    pub fn is_live(&self) -> bool {
        match &self.session {
            Some(session) => session.library().is_valid(self.id),
            None => false,
        }
    }

    /// The library's current reference count for this identifier.
    pub fn ref_count(&self) -> Result<u32> {
        let session = self.bound_session()?;
        session.library().ref_count(self.id).map_err(|_| {
            session.failure(
                ErrorDomain::Object,
                format!("unable to get reference count of {} {}", self.kind, self.id),
            )
        })
    }

    /// Another handle to the same identifier.
    ///
    /// An unbound handle clones to an unbound handle without calling the
    /// library. Otherwise the library count is incremented first; a failed
    /// increment is an object error carrying the mapped error stack.
    pub fn try_clone(&self) -> Result<Self> {
        let Some(session) = &self.session else {
            return Ok(Self::invalid(self.kind));
        };
        session
            .library()
            .inc_ref(self.id)
            .map_err(|_| session.failure(ErrorDomain::Object, "Reference counter increase failure"))?;
        Ok(Self {
            id: self.id,
            kind: self.kind,
            session: Some(session.clone()),
        })
    }

    pub(crate) fn bound_session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| Exception::object(format!("invalid {} handle", self.kind)))
    }

    fn release(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let id = core::mem::replace(&mut self.id, INVALID_HID);
        let library = session.library();
        // Without a count, a plain decrement still releases our reference.
        let outcome = match library.ref_count(id) {
            Ok(count) if count <= 1 => {
                tracing::trace!(id, kind = %self.kind, "closing last reference");
                self.kind.close(library, id)
            }
            _ => library.dec_ref(id).map(|_| ()),
        };
        if outcome.is_err() {
            let exc = session.failure(
                ErrorDomain::Object,
                format!("reference counter decrease failure on {} {id}", self.kind),
            );
            session.report_teardown(exc);
        }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("backend", &self.session.as_ref().map(|s| s.library().name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{FaultMode, MemoryLibrary, Op};
    use crate::props::{SessionProps, TeardownPolicy};
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryLibrary>, Session) {
        let lib = Arc::new(MemoryLibrary::new());
        let session = Session::from_arc(lib.clone());
        (lib, session)
    }

    #[test]
    fn invalid_handle() {
        let h = Handle::invalid(ObjectKind::Group);
        assert!(!h.is_valid());
        assert_eq!(h.id(), INVALID_HID);
        assert!(!h.is_live());
        assert!(h.session().is_none());
        assert!(h.ref_count().unwrap_err().is(ErrorDomain::Object));
    }

    #[test]
    fn clone_increments_and_keeps_id() {
        let (lib, session) = setup();
        let id = lib.register(ObjectKind::Group);
        let a = Handle::from_id(&session, ObjectKind::Group, id).unwrap();
        let b = a.try_clone().unwrap();
        assert_eq!(b.id(), a.id());
        assert_eq!(lib.ref_count_of(id), Some(2));
        assert_eq!(a.ref_count().unwrap(), 2);
        assert_eq!(lib.stats().inc_ref, 1);
    }

    #[test]
    fn clone_of_invalid_makes_no_calls() {
        let (lib, _session) = setup();
        let before = lib.stats().total;
        let h = Handle::invalid(ObjectKind::File);
        let c = h.try_clone().unwrap();
        assert!(!c.is_valid());
        drop(c);
        drop(h);
        assert_eq!(lib.stats().total, before);
    }

    #[test]
    fn last_drop_closes_once() {
        let (lib, session) = setup();
        let id = lib.register(ObjectKind::DataSet);
        let a = Handle::from_id(&session, ObjectKind::DataSet, id).unwrap();
        let b = a.try_clone().unwrap();
        drop(a);
        assert_eq!(lib.stats().closes(ObjectKind::DataSet), 0);
        assert!(b.is_valid());
        assert!(b.is_live());
        assert_eq!(lib.ref_count_of(id), Some(1));
        drop(b);
        assert_eq!(lib.stats().closes(ObjectKind::DataSet), 1);
        assert_eq!(lib.ref_count_of(id), None);
    }

    #[test]
    fn failed_increment_is_object_error() {
        let (lib, session) = setup();
        let id = lib.register(ObjectKind::File);
        let h = Handle::from_id(&session, ObjectKind::File, id).unwrap();
        lib.inject(Op::IncRef, FaultMode::WithStack);
        let err = h.try_clone().unwrap_err();
        assert!(err.is(ErrorDomain::Object));
        assert_eq!(err.what(), "Reference counter increase failure");
        let cause = err.next_exception().unwrap();
        assert_eq!(cause.err_minor(), crate::codes::MINOR_CANTINC);
        assert_eq!(lib.ref_count_of(id), Some(1));
    }

    #[test]
    fn bind_rejects_invalid_and_mismatched() {
        let (lib, session) = setup();
        assert!(Handle::from_id(&session, ObjectKind::File, INVALID_HID).is_err());
        let space = lib.register(ObjectKind::DataSpace);
        let err = Handle::from_id(&session, ObjectKind::File, space).unwrap_err();
        assert!(err.is(ErrorDomain::Object));
        assert_eq!(lib.ref_count_of(space), Some(1));

        let lax = Session::with_props(lib.clone(), SessionProps::new().skip_kind_check());
        let h = Handle::from_id(&lax, ObjectKind::DataSpace, space).unwrap();
        assert!(h.is_valid());
    }

    #[test]
    fn bind_rejects_uncategorised_except_attribute() {
        let (lib, session) = setup();
        let unknown = 0x7f00;
        let err = Handle::from_id(&session, ObjectKind::DataSet, unknown).unwrap_err();
        assert!(err.is(ErrorDomain::Object));
        let attr = Handle::from_id(&session, ObjectKind::Attribute, unknown).unwrap();
        assert!(attr.is_valid());
        // Not ours to release.
        std::mem::forget(attr);
        assert_eq!(lib.stats().total_closes(), 0);
    }

    #[test]
    fn teardown_failure_is_recorded_not_raised() {
        let lib = Arc::new(MemoryLibrary::new());
        let session =
            Session::with_props(lib.clone(), SessionProps::new().teardown(TeardownPolicy::Record));
        let id = lib.register(ObjectKind::Group);
        let h = Handle::from_id(&session, ObjectKind::Group, id).unwrap();
        lib.inject(Op::Close, FaultMode::WithStack);
        drop(h);
        let errors = session.take_teardown_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is(ErrorDomain::Object));
        assert!(errors[0].next_exception().is_some());
    }

    #[test]
    fn last_reference_released_when_count_unavailable() {
        let (lib, session) = setup();
        let id = lib.register(ObjectKind::DataSpace);
        let h = Handle::from_id(&session, ObjectKind::DataSpace, id).unwrap();
        lib.inject(Op::RefCount, FaultMode::Silent);
        drop(h);
        assert_eq!(lib.ref_count_of(id), None);
        assert_eq!(lib.stats().dec_ref, 1);
    }

    #[test]
    fn debug_output() {
        let h = Handle::invalid(ObjectKind::Attribute);
        let s = format!("{h:?}");
        assert!(s.contains("Attribute"));
        assert!(s.contains("-1"));
    }
}
