//! Checks against the system libhdf5. Run with `--features native`.

#![cfg(feature = "native")]

use std::sync::Arc;

use rustyhdf5_handle::{
    map_error_stack, DataSpace, ErrorDomain, File, FileMode, Library, NativeLibrary, ObjectKind,
    Session, SessionProps,
};

#[test]
fn missing_file_maps_real_stack() {
    let session = Session::new(NativeLibrary::new());
    let err = File::open(&session, "/nonexistent/rustyhdf5-handle.h5", FileMode::ReadOnly)
        .unwrap_err();
    assert_eq!(err.domain(), ErrorDomain::File);
    assert!(err.chain().count() > 1);
    assert!(err.chain().skip(1).all(|e| e.err_major() != 0));
}

#[test]
fn dataspace_refcount_roundtrip() {
    let session = Session::new(NativeLibrary::new());
    let space = DataSpace::simple(&session, &[4, 4]).unwrap();
    assert_eq!(session.library().object_kind(space.id()), Some(ObjectKind::DataSpace));
    let copy = space.try_clone().unwrap();
    assert_eq!(space.ref_count().unwrap(), 2);
    let id = copy.id();
    drop(space);
    assert!(copy.is_live());
    drop(copy);
    assert!(!NativeLibrary::new().is_valid(id));
}

#[test]
fn reading_the_stack_keeps_it_until_cleared() {
    let lib = NativeLibrary::new();
    assert!(lib.open_file("/nonexistent/keep.h5", FileMode::ReadOnly).is_err());
    let first = map_error_stack(&lib, ErrorDomain::File, false);
    let second = map_error_stack(&lib, ErrorDomain::File, true);
    assert_eq!(first.chain().count(), second.chain().count());
    assert!(lib.error_stack().unwrap().is_empty());
}

#[test]
fn keep_stack_session_leaves_frames() {
    let lib = Arc::new(NativeLibrary::new());
    let session = Session::with_props(lib.clone(), SessionProps::new().keep_stack());
    assert!(File::open(&session, "/nonexistent/kept.h5", FileMode::ReadOnly).is_err());
    assert!(!lib.error_stack().unwrap().is_empty());
    lib.clear_error_stack();
}
