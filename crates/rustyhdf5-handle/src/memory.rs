//! In-process implementation of [`Library`].
//!
//! Keeps an identifier table with real reference counts, a per-library error
//! stack filled the way the C library fills it (innermost frame first), and
//! a namespace of files holding groups and datasets. Every primitive clears
//! the error stack on entry, like an API call does in the C library, so a
//! failure leaves exactly the frames that call pushed.
//!
//! Call statistics and fault injection make it usable as a test double:
//!
//! ```
//! use std::sync::Arc;
//! use rustyhdf5_handle::{File, FileMode, MemoryLibrary, Session};
//!
//! let lib = Arc::new(MemoryLibrary::new());
//! lib.add_file("data.h5");
//! let session = Session::from_arc(lib.clone());
//!
//! let file = File::open(&session, "data.h5", FileMode::ReadOnly).unwrap();
//! let copy = file.try_clone().unwrap();
//! assert_eq!(lib.ref_count_of(file.id()), Some(2));
//! drop(file);
//! drop(copy);
//! assert_eq!(lib.stats().closes(rustyhdf5_handle::ObjectKind::File), 1);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::codes::{self, *};
use crate::library::{CallFailed, ErrorFrame, FileMode, Library};
use crate::object::ObjectKind;
use crate::Hid;

/// First identifier handed out; mirrors the C library's tagged id space.
const FIRST_ID: Hid = 0x0100_0000_0000_0000;

/// Maximum dataspace rank.
const MAX_RANK: usize = 32;

/// Primitive that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `inc_ref`.
    IncRef,
    /// `dec_ref`.
    DecRef,
    /// `ref_count`.
    RefCount,
    /// Every `close_*` routine.
    Close,
    /// `error_stack`.
    ErrorStack,
    /// `create_file`.
    CreateFile,
    /// `open_file`.
    OpenFile,
    /// `create_group`.
    CreateGroup,
    /// `open_group`.
    OpenGroup,
    /// `create_simple_dataspace`.
    CreateDataspace,
    /// `open_dataset`.
    OpenDataset,
}

impl Op {
    fn codes(self) -> (Hid, Hid) {
        match self {
            Op::IncRef => (MAJOR_ID, MINOR_CANTINC),
            Op::DecRef => (MAJOR_ID, MINOR_CANTDEC),
            Op::RefCount => (MAJOR_ID, MINOR_CANTGET),
            Op::Close => (MAJOR_ID, MINOR_CANTCLOSEOBJ),
            Op::ErrorStack => (MAJOR_ERROR, MINOR_CANTGET),
            Op::CreateFile => (MAJOR_FILE, MINOR_CANTCREATE),
            Op::OpenFile => (MAJOR_FILE, MINOR_CANTOPENFILE),
            Op::CreateGroup => (MAJOR_SYM, MINOR_CANTCREATE),
            Op::OpenGroup => (MAJOR_SYM, MINOR_CANTOPENOBJ),
            Op::CreateDataspace => (MAJOR_DATASPACE, MINOR_CANTCREATE),
            Op::OpenDataset => (MAJOR_DATASET, MINOR_CANTOPENOBJ),
        }
    }
}

/// How an injected fault fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultMode {
    /// Push one frame describing the failure.
    WithStack,
    /// Fail with an empty error stack.
    Silent,
}

/// Counters of primitive calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStats {
    /// Every primitive call, including error-stack calls.
    pub total: usize,
    /// `inc_ref` calls.
    pub inc_ref: usize,
    /// `dec_ref` calls.
    pub dec_ref: usize,
    /// `ref_count` calls.
    pub ref_count: usize,
    closes: HashMap<ObjectKind, usize>,
}

impl CallStats {
    /// Calls of the close routine for `kind`.
    pub fn closes(&self, kind: ObjectKind) -> usize {
        self.closes.get(&kind).copied().unwrap_or(0)
    }

    /// Calls of any close routine.
    pub fn total_closes(&self) -> usize {
        self.closes.values().sum()
    }
}

#[derive(Debug)]
struct Entry {
    kind: ObjectKind,
    refs: u32,
    file: String,
    path: String,
    writable: bool,
}

#[derive(Debug)]
struct FileNode {
    links: HashMap<String, ObjectKind>,
}

impl FileNode {
    fn new() -> Self {
        let mut links = HashMap::new();
        links.insert("/".to_string(), ObjectKind::Group);
        Self { links }
    }
}

#[derive(Debug)]
struct State {
    next_id: Hid,
    objects: HashMap<Hid, Entry>,
    files: HashMap<String, FileNode>,
    stack: Vec<ErrorFrame>,
    stats: CallStats,
    faults: HashMap<Op, FaultMode>,
}

fn frame(function: &str, major: Hid, minor: Hid, description: impl Into<String>) -> ErrorFrame {
    ErrorFrame::new(major, minor, description)
        .in_function(function)
        .with_messages(codes::major_message(major), codes::minor_message(minor))
}

fn join_path(base: &str, name: &str) -> String {
    if name.starts_with('/') {
        return name.to_string();
    }
    let base = base.trim_end_matches('/');
    format!("{base}/{name}")
}

fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}

impl State {
    fn push(&mut self, function: &str, major: Hid, minor: Hid, description: impl Into<String>) {
        self.stack.push(frame(function, major, minor, description));
    }

    fn fault(&mut self, op: Op, function: &str) -> Result<(), CallFailed> {
        match self.faults.get(&op).copied() {
            None => Ok(()),
            Some(FaultMode::Silent) => Err(CallFailed),
            Some(FaultMode::WithStack) => {
                let (major, minor) = op.codes();
                self.push(function, major, minor, format!("injected failure: {op:?}"));
                Err(CallFailed)
            }
        }
    }

    fn issue(&mut self, kind: ObjectKind, file: &str, path: &str, writable: bool) -> Hid {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.insert(
            id,
            Entry {
                kind,
                refs: 1,
                file: file.to_string(),
                path: path.to_string(),
                writable,
            },
        );
        id
    }

    fn entry_mut(&mut self, id: Hid, function: &str) -> Result<&mut Entry, CallFailed> {
        let State { objects, stack, .. } = self;
        match objects.get_mut(&id) {
            Some(entry) => Ok(entry),
            None => {
                stack.push(frame(function, MAJOR_ID, MINOR_BADID, format!("can't locate ID {id}")));
                Err(CallFailed)
            }
        }
    }

    /// Resolve `name` relative to the location `loc` into (file, path, writable).
    fn resolve(
        &mut self,
        loc: Hid,
        name: &str,
        function: &str,
    ) -> Result<(String, String, bool), CallFailed> {
        let entry = self.entry_mut(loc, function)?;
        let base = match entry.kind {
            ObjectKind::File => "/".to_string(),
            ObjectKind::Group => entry.path.clone(),
            _ => {
                self.push(function, MAJOR_ARGS, MINOR_BADTYPE, "not a location");
                return Err(CallFailed);
            }
        };
        let entry = self.entry_mut(loc, function)?;
        Ok((entry.file.clone(), join_path(&base, name), entry.writable))
    }

    fn lookup(&self, file: &str, path: &str) -> Option<ObjectKind> {
        self.files.get(file).and_then(|node| node.links.get(path).copied())
    }

    fn close(&mut self, id: Hid, kind: ObjectKind, function: &str) -> Result<(), CallFailed> {
        self.stats.total += 1;
        self.stack.clear();
        *self.stats.closes.entry(kind).or_insert(0) += 1;
        self.fault(Op::Close, function)?;
        let entry = self.entry_mut(id, function)?;
        if entry.kind != kind {
            self.push(function, MAJOR_ARGS, MINOR_BADTYPE, format!("not a {kind} ID"));
            return Err(CallFailed);
        }
        entry.refs -= 1;
        if entry.refs == 0 {
            self.objects.remove(&id);
        }
        Ok(())
    }
}

/// In-process library.
#[derive(Debug)]
pub struct MemoryLibrary {
    state: Mutex<State>,
}

impl Default for MemoryLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLibrary {
    /// Empty library: no files, no identifiers.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: FIRST_ID,
                objects: HashMap::new(),
                files: HashMap::new(),
                stack: Vec::new(),
                stats: CallStats::default(),
                faults: HashMap::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lock the state for an API call: count it and clear the error stack.
    fn enter(&self) -> MutexGuard<'_, State> {
        let mut st = self.state();
        st.stats.total += 1;
        st.stack.clear();
        st
    }

    // -----------------------------------------------------------------------
    // Seeding and inspection (not library calls)
    // -----------------------------------------------------------------------

    /// Add an empty file at `path`, replacing any existing one.
    pub fn add_file(&self, path: &str) {
        self.state().files.insert(path.to_string(), FileNode::new());
    }

    /// Add a group link at absolute `path` inside `file`, creating the file
    /// if needed.
    pub fn add_group(&self, file: &str, path: &str) {
        self.add_link(file, path, ObjectKind::Group);
    }

    /// Add a dataset link at absolute `path` inside `file`, creating the
    /// file if needed.
    pub fn add_dataset(&self, file: &str, path: &str) {
        self.add_link(file, path, ObjectKind::DataSet);
    }

    fn add_link(&self, file: &str, path: &str, kind: ObjectKind) {
        let mut st = self.state();
        let node = st.files.entry(file.to_string()).or_insert_with(FileNode::new);
        node.links.insert(join_path("/", path), kind);
    }

    /// Issue a detached identifier of `kind` with one reference.
    pub fn register(&self, kind: ObjectKind) -> Hid {
        self.state().issue(kind, "", "", true)
    }

    /// Push a frame onto the error stack.
    pub fn push_error(&self, frame: ErrorFrame) {
        self.state().stack.push(frame);
    }

    /// Reference count of `id`, or `None` once it has been released.
    pub fn ref_count_of(&self, id: Hid) -> Option<u32> {
        self.state().objects.get(&id).map(|e| e.refs)
    }

    /// Every identifier still held, ascending.
    pub fn live_ids(&self) -> Vec<Hid> {
        let mut ids: Vec<Hid> = self.state().objects.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Whether a file exists at `path`.
    pub fn has_file(&self, path: &str) -> bool {
        self.state().files.contains_key(path)
    }

    /// Snapshot of the call counters.
    pub fn stats(&self) -> CallStats {
        self.state().stats.clone()
    }

    /// Zero the call counters.
    pub fn reset_stats(&self) {
        self.state().stats = CallStats::default();
    }

    /// Make `op` fail until healed.
    pub fn inject(&self, op: Op, mode: FaultMode) {
        self.state().faults.insert(op, mode);
    }

    /// Stop failing `op`.
    pub fn heal(&self, op: Op) {
        self.state().faults.remove(&op);
    }

    /// Stop failing every primitive.
    pub fn heal_all(&self) {
        self.state().faults.clear();
    }

    /// Operations currently forced to fail.
    pub fn faults(&self) -> HashSet<Op> {
        self.state().faults.keys().copied().collect()
    }
}

impl Library for MemoryLibrary {
    fn name(&self) -> &str {
        "memory"
    }

    fn is_valid(&self, id: Hid) -> bool {
        self.enter().objects.contains_key(&id)
    }

    fn object_kind(&self, id: Hid) -> Option<ObjectKind> {
        self.enter().objects.get(&id).map(|e| e.kind)
    }

    fn inc_ref(&self, id: Hid) -> Result<u32, CallFailed> {
        let mut st = self.enter();
        st.stats.inc_ref += 1;
        st.fault(Op::IncRef, "H5Iinc_ref")?;
        let entry = st.entry_mut(id, "H5Iinc_ref")?;
        entry.refs += 1;
        Ok(entry.refs)
    }

    fn dec_ref(&self, id: Hid) -> Result<u32, CallFailed> {
        let mut st = self.enter();
        st.stats.dec_ref += 1;
        st.fault(Op::DecRef, "H5Idec_ref")?;
        let entry = st.entry_mut(id, "H5Idec_ref")?;
        entry.refs -= 1;
        let refs = entry.refs;
        if refs == 0 {
            st.objects.remove(&id);
        }
        Ok(refs)
    }

    fn ref_count(&self, id: Hid) -> Result<u32, CallFailed> {
        let mut st = self.enter();
        st.stats.ref_count += 1;
        st.fault(Op::RefCount, "H5Iget_ref")?;
        Ok(st.entry_mut(id, "H5Iget_ref")?.refs)
    }

    fn close_file(&self, id: Hid) -> Result<(), CallFailed> {
        self.state().close(id, ObjectKind::File, "H5Fclose")
    }

    fn close_group(&self, id: Hid) -> Result<(), CallFailed> {
        self.state().close(id, ObjectKind::Group, "H5Gclose")
    }

    fn close_dataset(&self, id: Hid) -> Result<(), CallFailed> {
        self.state().close(id, ObjectKind::DataSet, "H5Dclose")
    }

    fn close_dataspace(&self, id: Hid) -> Result<(), CallFailed> {
        self.state().close(id, ObjectKind::DataSpace, "H5Sclose")
    }

    fn close_attribute(&self, id: Hid) -> Result<(), CallFailed> {
        self.state().close(id, ObjectKind::Attribute, "H5Aclose")
    }

    fn close_datatype(&self, id: Hid) -> Result<(), CallFailed> {
        self.state().close(id, ObjectKind::Datatype, "H5Tclose")
    }

    fn error_stack(&self) -> Result<Vec<ErrorFrame>, CallFailed> {
        let mut st = self.state();
        st.stats.total += 1;
        if st.faults.contains_key(&Op::ErrorStack) {
            return Err(CallFailed);
        }
        Ok(st.stack.clone())
    }

    fn clear_error_stack(&self) {
        let mut st = self.state();
        st.stats.total += 1;
        st.stack.clear();
    }

    fn create_file(&self, path: &str, mode: FileMode) -> Result<Hid, CallFailed> {
        let mut st = self.enter();
        st.fault(Op::CreateFile, "H5Fcreate")?;
        match mode {
            FileMode::Truncate => {}
            FileMode::Exclusive => {
                if st.files.contains_key(path) {
                    st.push(
                        "H5FD_sec2_open",
                        MAJOR_FILE,
                        MINOR_FILEEXISTS,
                        format!("unable to open file: name = '{path}', errno = 17, error message = 'File exists'"),
                    );
                    st.push("H5F_open", MAJOR_FILE, MINOR_CANTOPENFILE, format!("unable to open file: name = '{path}'"));
                    st.push("H5Fcreate", MAJOR_FILE, MINOR_CANTCREATE, "unable to create file");
                    return Err(CallFailed);
                }
            }
            FileMode::ReadOnly | FileMode::ReadWrite => {
                st.push("H5Fcreate", MAJOR_ARGS, MINOR_UNSUPPORTED, "invalid flags for file creation");
                return Err(CallFailed);
            }
        }
        st.files.insert(path.to_string(), FileNode::new());
        Ok(st.issue(ObjectKind::File, path, "/", true))
    }

    fn open_file(&self, path: &str, mode: FileMode) -> Result<Hid, CallFailed> {
        let mut st = self.enter();
        st.fault(Op::OpenFile, "H5Fopen")?;
        let writable = match mode {
            FileMode::ReadOnly => false,
            FileMode::ReadWrite => true,
            FileMode::Truncate | FileMode::Exclusive => {
                st.push("H5Fopen", MAJOR_ARGS, MINOR_UNSUPPORTED, "invalid file open flags");
                return Err(CallFailed);
            }
        };
        if !st.files.contains_key(path) {
            st.push(
                "H5FD_sec2_open",
                MAJOR_FILE,
                MINOR_CANTOPENFILE,
                format!(
                    "unable to open file: name = '{path}', errno = 2, error message = 'No such file or directory'"
                ),
            );
            st.push("H5F_open", MAJOR_FILE, MINOR_CANTOPENFILE, format!("unable to open file: name = '{path}'"));
            st.push("H5Fopen", MAJOR_FILE, MINOR_CANTOPENFILE, "unable to open file");
            return Err(CallFailed);
        }
        Ok(st.issue(ObjectKind::File, path, "/", writable))
    }

    fn create_group(&self, loc: Hid, name: &str) -> Result<Hid, CallFailed> {
        let mut st = self.enter();
        st.fault(Op::CreateGroup, "H5Gcreate2")?;
        let (file, path, writable) = st.resolve(loc, name, "H5Gcreate2")?;
        if !writable {
            st.push("H5G__create_named", MAJOR_SYM, MINOR_CANTCREATE, "no write intent on file");
            st.push("H5Gcreate2", MAJOR_SYM, MINOR_CANTCREATE, "unable to create group");
            return Err(CallFailed);
        }
        if st.lookup(&file, &path).is_some() {
            st.push("H5L__link_cb", MAJOR_SYM, MINOR_EXISTS, "name already exists");
            st.push("H5Gcreate2", MAJOR_SYM, MINOR_CANTCREATE, "unable to create group");
            return Err(CallFailed);
        }
        if st.lookup(&file, parent_path(&path)) != Some(ObjectKind::Group) {
            st.push("H5G__traverse_real", MAJOR_SYM, MINOR_NOTFOUND, "component not found");
            st.push("H5Gcreate2", MAJOR_SYM, MINOR_CANTCREATE, "unable to create group");
            return Err(CallFailed);
        }
        if let Some(node) = st.files.get_mut(&file) {
            node.links.insert(path.clone(), ObjectKind::Group);
        }
        Ok(st.issue(ObjectKind::Group, &file, &path, writable))
    }

    fn open_group(&self, loc: Hid, name: &str) -> Result<Hid, CallFailed> {
        let mut st = self.enter();
        st.fault(Op::OpenGroup, "H5Gopen2")?;
        let (file, path, writable) = st.resolve(loc, name, "H5Gopen2")?;
        match st.lookup(&file, &path) {
            Some(ObjectKind::Group) => Ok(st.issue(ObjectKind::Group, &file, &path, writable)),
            Some(_) => {
                st.push("H5G__open_name", MAJOR_SYM, MINOR_BADTYPE, "not a group");
                st.push("H5Gopen2", MAJOR_SYM, MINOR_CANTOPENOBJ, "unable to open group");
                Err(CallFailed)
            }
            None => {
                st.push("H5G__traverse_real", MAJOR_SYM, MINOR_NOTFOUND, "component not found");
                st.push("H5G_loc_find", MAJOR_SYM, MINOR_NOTFOUND, format!("object '{name}' doesn't exist"));
                st.push("H5Gopen2", MAJOR_SYM, MINOR_CANTOPENOBJ, "unable to open group");
                Err(CallFailed)
            }
        }
    }

    fn create_simple_dataspace(&self, dims: &[u64]) -> Result<Hid, CallFailed> {
        let mut st = self.enter();
        st.fault(Op::CreateDataspace, "H5Screate_simple")?;
        if dims.len() > MAX_RANK {
            st.push("H5Screate_simple", MAJOR_ARGS, MINOR_BADRANGE, "invalid rank");
            return Err(CallFailed);
        }
        Ok(st.issue(ObjectKind::DataSpace, "", "", true))
    }

    fn open_dataset(&self, loc: Hid, name: &str) -> Result<Hid, CallFailed> {
        let mut st = self.enter();
        st.fault(Op::OpenDataset, "H5Dopen2")?;
        let (file, path, writable) = st.resolve(loc, name, "H5Dopen2")?;
        match st.lookup(&file, &path) {
            Some(ObjectKind::DataSet) => Ok(st.issue(ObjectKind::DataSet, &file, &path, writable)),
            Some(_) => {
                st.push("H5D__open_name", MAJOR_DATASET, MINOR_BADTYPE, "not a dataset");
                st.push("H5Dopen2", MAJOR_DATASET, MINOR_CANTOPENOBJ, "unable to open dataset");
                Err(CallFailed)
            }
            None => {
                st.push("H5G_loc_find", MAJOR_SYM, MINOR_NOTFOUND, format!("object '{name}' doesn't exist"));
                st.push("H5D__open_name", MAJOR_DATASET, MINOR_NOTFOUND, "not found");
                st.push("H5Dopen2", MAJOR_DATASET, MINOR_CANTOPENOBJ, "unable to open dataset");
                Err(CallFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_counted() {
        let lib = MemoryLibrary::new();
        let a = lib.register(ObjectKind::Group);
        let b = lib.register(ObjectKind::Group);
        assert_ne!(a, b);
        assert_eq!(lib.inc_ref(a), Ok(2));
        assert_eq!(lib.ref_count(a), Ok(2));
        assert_eq!(lib.dec_ref(a), Ok(1));
        assert_eq!(lib.dec_ref(a), Ok(0));
        assert!(!lib.is_valid(a));
        assert_eq!(lib.live_ids(), vec![b]);
    }

    #[test]
    fn bad_id_pushes_frame() {
        let lib = MemoryLibrary::new();
        assert_eq!(lib.inc_ref(42), Err(CallFailed));
        let stack = lib.error_stack().unwrap();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].minor, MINOR_BADID);
        assert_eq!(stack[0].function, "H5Iinc_ref");
    }

    #[test]
    fn api_call_clears_previous_stack() {
        let lib = MemoryLibrary::new();
        assert!(lib.open_file("x.h5", FileMode::ReadOnly).is_err());
        assert_eq!(lib.error_stack().unwrap().len(), 3);
        let id = lib.register(ObjectKind::Group);
        assert!(lib.ref_count(id).is_ok());
        assert!(lib.error_stack().unwrap().is_empty());
    }

    #[test]
    fn missing_file_frames_oldest_first() {
        let lib = MemoryLibrary::new();
        assert!(lib.open_file("x.h5", FileMode::ReadOnly).is_err());
        let stack = lib.error_stack().unwrap();
        let functions: Vec<_> = stack.iter().map(|f| f.function.as_str()).collect();
        assert_eq!(functions, ["H5FD_sec2_open", "H5F_open", "H5Fopen"]);
        assert!(stack.iter().all(|f| f.minor == MINOR_CANTOPENFILE));
        assert_eq!(stack[2].minor_message, "Unable to open file");
    }

    #[test]
    fn create_modes() {
        let lib = MemoryLibrary::new();
        let f = lib.create_file("new.h5", FileMode::Exclusive).unwrap();
        assert_eq!(lib.object_kind(f), Some(ObjectKind::File));
        assert!(lib.create_file("new.h5", FileMode::Exclusive).is_err());
        assert_eq!(lib.error_stack().unwrap()[0].minor, MINOR_FILEEXISTS);
        assert!(lib.create_file("new.h5", FileMode::Truncate).is_ok());
        assert!(lib.create_file("new.h5", FileMode::ReadOnly).is_err());
        assert!(lib.open_file("new.h5", FileMode::Truncate).is_err());
    }

    #[test]
    fn groups_and_datasets() {
        let lib = MemoryLibrary::new();
        lib.add_dataset("d.h5", "/grp/values");
        lib.add_group("d.h5", "/grp");
        let f = lib.open_file("d.h5", FileMode::ReadWrite).unwrap();
        let g = lib.open_group(f, "grp").unwrap();
        assert!(lib.open_dataset(g, "values").is_ok());
        assert!(lib.open_dataset(f, "/grp/values").is_ok());
        assert!(lib.open_group(g, "values").is_err());
        assert!(lib.open_dataset(f, "grp").is_err());
        assert!(lib.open_dataset(f, "missing").is_err());
        assert_eq!(lib.error_stack().unwrap().last().unwrap().major, MAJOR_DATASET);

        let sub = lib.create_group(g, "sub").unwrap();
        assert_eq!(lib.object_kind(sub), Some(ObjectKind::Group));
        assert!(lib.open_group(f, "/grp/sub").is_ok());
        assert!(lib.create_group(g, "sub").is_err());
        assert!(lib.create_group(f, "a/b").is_err());
        assert!(lib.open_group(f, "/").is_ok());
    }

    #[test]
    fn read_only_file_rejects_create() {
        let lib = MemoryLibrary::new();
        lib.add_file("ro.h5");
        let f = lib.open_file("ro.h5", FileMode::ReadOnly).unwrap();
        assert!(lib.create_group(f, "g").is_err());
        assert_eq!(lib.error_stack().unwrap()[0].description, "no write intent on file");
    }

    #[test]
    fn location_must_be_file_or_group() {
        let lib = MemoryLibrary::new();
        let space = lib.create_simple_dataspace(&[2, 2]).unwrap();
        assert!(lib.open_group(space, "g").is_err());
        assert_eq!(lib.error_stack().unwrap()[0].minor, MINOR_BADTYPE);
    }

    #[test]
    fn dataspace_rank_limit() {
        let lib = MemoryLibrary::new();
        assert!(lib.create_simple_dataspace(&[]).is_ok());
        assert!(lib.create_simple_dataspace(&[1; 33]).is_err());
    }

    #[test]
    fn close_decrements_then_frees() {
        let lib = MemoryLibrary::new();
        let id = lib.register(ObjectKind::File);
        lib.inc_ref(id).unwrap();
        lib.close_file(id).unwrap();
        assert_eq!(lib.ref_count_of(id), Some(1));
        lib.close_file(id).unwrap();
        assert_eq!(lib.ref_count_of(id), None);
        assert!(lib.close_file(id).is_err());
        assert_eq!(lib.stats().closes(ObjectKind::File), 3);
        assert_eq!(lib.stats().total_closes(), 3);
    }

    #[test]
    fn faults_inject_and_heal() {
        let lib = MemoryLibrary::new();
        let id = lib.register(ObjectKind::Group);
        lib.inject(Op::DecRef, FaultMode::Silent);
        assert!(lib.faults().contains(&Op::DecRef));
        assert!(lib.dec_ref(id).is_err());
        assert!(lib.error_stack().unwrap().is_empty());
        lib.heal(Op::DecRef);
        lib.inject(Op::RefCount, FaultMode::WithStack);
        assert!(lib.ref_count(id).is_err());
        assert_eq!(lib.error_stack().unwrap()[0].minor, MINOR_CANTGET);
        lib.heal_all();
        assert!(lib.faults().is_empty());
        assert_eq!(lib.ref_count(id), Ok(1));
    }

    #[test]
    fn stats_count_calls() {
        let lib = MemoryLibrary::new();
        let id = lib.register(ObjectKind::Group);
        lib.inc_ref(id).unwrap();
        lib.dec_ref(id).unwrap();
        lib.ref_count(id).unwrap();
        let s = lib.stats();
        assert_eq!((s.inc_ref, s.dec_ref, s.ref_count, s.total), (1, 1, 1, 3));
        lib.reset_stats();
        assert_eq!(lib.stats(), CallStats::default());
    }

    #[test]
    fn path_helpers() {
        assert_eq!(join_path("/", "a"), "/a");
        assert_eq!(join_path("/a", "b"), "/a/b");
        assert_eq!(join_path("/a", "/c"), "/c");
        assert_eq!(parent_path("/a/b"), "/a");
        assert_eq!(parent_path("/a"), "/");
    }
}
