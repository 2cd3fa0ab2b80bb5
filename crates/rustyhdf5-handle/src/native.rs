//! [`Library`] over the system HDF5 C library.
//!
//! Only the primitives this crate consumes are declared. Identifiers are
//! 64-bit (`hid_t` since HDF5 1.10). No locking is added: concurrent use is
//! only sound with a thread-safe libhdf5 build.

use std::ffi::{c_char, c_int, c_uint, c_void, CStr, CString};
use std::ptr;

use crate::library::{CallFailed, ErrorFrame, FileMode, Library};
use crate::object::ObjectKind;
use crate::Hid;

type Herr = c_int;
type Htri = c_int;

// H5Ppublic.h / H5Epublic.h
const H5P_DEFAULT: Hid = 0;
const H5E_DEFAULT: Hid = 0;

// H5Fpublic.h
const H5F_ACC_RDONLY: c_uint = 0x0000;
const H5F_ACC_RDWR: c_uint = 0x0001;
const H5F_ACC_TRUNC: c_uint = 0x0002;
const H5F_ACC_EXCL: c_uint = 0x0004;

// H5Ipublic.h (H5I_type_t)
const H5I_FILE: c_int = 1;
const H5I_GROUP: c_int = 2;
const H5I_DATATYPE: c_int = 3;
const H5I_DATASPACE: c_int = 4;
const H5I_DATASET: c_int = 5;
// H5I_MAP took 6 in 1.12, moving H5I_ATTR from 6 to 7.
const H5I_ATTR_1_10: c_int = 6;
const H5I_ATTR_1_12: c_int = 7;

// H5E_direction_t: walk from the innermost frame outwards.
const H5E_WALK_UPWARD: c_int = 0;

#[repr(C)]
#[allow(dead_code)]
struct H5EError2 {
    cls_id: Hid,
    maj_num: Hid,
    min_num: Hid,
    line: c_uint,
    func_name: *const c_char,
    file_name: *const c_char,
    desc: *const c_char,
}

type H5EWalk2 = Option<unsafe extern "C" fn(c_uint, *const H5EError2, *mut c_void) -> Herr>;

#[link(name = "hdf5")]
unsafe extern "C" {
    fn H5Iinc_ref(id: Hid) -> c_int;
    fn H5Idec_ref(id: Hid) -> c_int;
    fn H5Iget_ref(id: Hid) -> c_int;
    fn H5Iis_valid(id: Hid) -> Htri;
    fn H5Iget_type(id: Hid) -> c_int;
    fn H5get_libversion(majnum: *mut c_uint, minnum: *mut c_uint, relnum: *mut c_uint) -> Herr;

    fn H5Fclose(id: Hid) -> Herr;
    fn H5Gclose(id: Hid) -> Herr;
    fn H5Dclose(id: Hid) -> Herr;
    fn H5Sclose(id: Hid) -> Herr;
    fn H5Aclose(id: Hid) -> Herr;
    fn H5Tclose(id: Hid) -> Herr;

    fn H5Eget_current_stack() -> Hid;
    fn H5Ewalk2(stack: Hid, direction: c_int, func: H5EWalk2, client_data: *mut c_void) -> Herr;
    fn H5Eclose_stack(stack: Hid) -> Herr;
    fn H5Eset_current_stack(stack: Hid) -> Herr;
    fn H5Eclear2(stack: Hid) -> Herr;
    fn H5Eget_msg(msg_id: Hid, msg_type: *mut c_int, msg: *mut c_char, size: usize) -> isize;

    fn H5Fcreate(name: *const c_char, flags: c_uint, fcpl: Hid, fapl: Hid) -> Hid;
    fn H5Fopen(name: *const c_char, flags: c_uint, fapl: Hid) -> Hid;
    fn H5Gcreate2(loc: Hid, name: *const c_char, lcpl: Hid, gcpl: Hid, gapl: Hid) -> Hid;
    fn H5Gopen2(loc: Hid, name: *const c_char, gapl: Hid) -> Hid;
    fn H5Screate_simple(rank: c_int, dims: *const u64, maxdims: *const u64) -> Hid;
    fn H5Dopen2(loc: Hid, name: *const c_char, dapl: Hid) -> Hid;
}

fn status(code: Herr) -> Result<(), CallFailed> {
    if code < 0 {
        Err(CallFailed)
    } else {
        Ok(())
    }
}

fn count(code: c_int) -> Result<u32, CallFailed> {
    u32::try_from(code).map_err(|_| CallFailed)
}

fn ident(id: Hid) -> Result<Hid, CallFailed> {
    if id < 0 {
        Err(CallFailed)
    } else {
        Ok(id)
    }
}

fn c_string(s: &str) -> Result<CString, CallFailed> {
    CString::new(s).map_err(|_| CallFailed)
}

/// Copy a possibly-null C string.
///
/// # Safety
/// `p` must be null or point to a NUL-terminated string.
unsafe fn lossy(p: *const c_char) -> String {
    if p.is_null() {
        String::new()
    } else {
        // SAFETY: non-null and NUL-terminated per the caller.
        unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned()
    }
}

fn message_text(msg_id: Hid) -> String {
    // SAFETY: a null buffer with size 0 only queries the length.
    let len = unsafe { H5Eget_msg(msg_id, ptr::null_mut(), ptr::null_mut(), 0) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u8; len as usize + 1];
    // SAFETY: `buf` holds `len + 1` bytes, room for the text and its NUL.
    let written = unsafe {
        H5Eget_msg(msg_id, ptr::null_mut(), buf.as_mut_ptr().cast(), buf.len())
    };
    if written <= 0 {
        return String::new();
    }
    buf.truncate(written as usize);
    String::from_utf8_lossy(&buf).into_owned()
}

unsafe extern "C" fn collect_frame(
    _n: c_uint,
    err: *const H5EError2,
    client_data: *mut c_void,
) -> Herr {
    if err.is_null() || client_data.is_null() {
        return -1;
    }
    // SAFETY: H5Ewalk2 passes a valid frame and our `Vec` as client data.
    let (err, frames) = unsafe { (&*err, &mut *client_data.cast::<Vec<ErrorFrame>>()) };
    // SAFETY: the string fields of a live frame are null or NUL-terminated.
    let (description, function, file) =
        unsafe { (lossy(err.desc), lossy(err.func_name), lossy(err.file_name)) };
    frames.push(ErrorFrame {
        description,
        major: err.maj_num,
        minor: err.min_num,
        major_message: message_text(err.maj_num),
        minor_message: message_text(err.min_num),
        function,
        file,
        line: err.line,
    });
    0
}

/// `H5I_type_t` tag of attributes in the linked library version.
fn attribute_tag() -> c_int {
    let (mut major, mut minor, mut release) = (0, 0, 0);
    // SAFETY: the three out-pointers are valid for the duration of the call.
    let status = unsafe { H5get_libversion(&mut major, &mut minor, &mut release) };
    if status >= 0 && (major, minor) < (1, 12) {
        H5I_ATTR_1_10
    } else {
        H5I_ATTR_1_12
    }
}

/// The system HDF5 library.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeLibrary;

impl NativeLibrary {
    /// Handle to the linked library.
    pub fn new() -> Self {
        Self
    }
}

impl Library for NativeLibrary {
    fn name(&self) -> &str {
        "native"
    }

    fn is_valid(&self, id: Hid) -> bool {
        // SAFETY: H5Iis_valid accepts any identifier value.
        unsafe { H5Iis_valid(id) > 0 }
    }

    fn object_kind(&self, id: Hid) -> Option<ObjectKind> {
        // SAFETY: H5Iget_type accepts any identifier value.
        match unsafe { H5Iget_type(id) } {
            H5I_FILE => Some(ObjectKind::File),
            H5I_GROUP => Some(ObjectKind::Group),
            H5I_DATATYPE => Some(ObjectKind::Datatype),
            H5I_DATASPACE => Some(ObjectKind::DataSpace),
            H5I_DATASET => Some(ObjectKind::DataSet),
            tag if tag == attribute_tag() => Some(ObjectKind::Attribute),
            _ => None,
        }
    }

    fn inc_ref(&self, id: Hid) -> Result<u32, CallFailed> {
        // SAFETY: plain call on an identifier; failure is reported by value.
        count(unsafe { H5Iinc_ref(id) })
    }

    fn dec_ref(&self, id: Hid) -> Result<u32, CallFailed> {
        // SAFETY: as above.
        count(unsafe { H5Idec_ref(id) })
    }

    fn ref_count(&self, id: Hid) -> Result<u32, CallFailed> {
        // SAFETY: as above.
        count(unsafe { H5Iget_ref(id) })
    }

    fn close_file(&self, id: Hid) -> Result<(), CallFailed> {
        // SAFETY: as above.
        status(unsafe { H5Fclose(id) })
    }

    fn close_group(&self, id: Hid) -> Result<(), CallFailed> {
        // SAFETY: as above.
        status(unsafe { H5Gclose(id) })
    }

    fn close_dataset(&self, id: Hid) -> Result<(), CallFailed> {
        // SAFETY: as above.
        status(unsafe { H5Dclose(id) })
    }

    fn close_dataspace(&self, id: Hid) -> Result<(), CallFailed> {
        // SAFETY: as above.
        status(unsafe { H5Sclose(id) })
    }

    fn close_attribute(&self, id: Hid) -> Result<(), CallFailed> {
        // SAFETY: as above.
        status(unsafe { H5Aclose(id) })
    }

    fn close_datatype(&self, id: Hid) -> Result<(), CallFailed> {
        // SAFETY: as above.
        status(unsafe { H5Tclose(id) })
    }

    fn error_stack(&self) -> Result<Vec<ErrorFrame>, CallFailed> {
        // SAFETY: copies the default stack of this thread, clearing it.
        let stack = ident(unsafe { H5Eget_current_stack() })?;
        let mut frames: Vec<ErrorFrame> = Vec::new();
        // SAFETY: `frames` outlives the walk and is only touched by the callback.
        let walked = unsafe {
            H5Ewalk2(
                stack,
                H5E_WALK_UPWARD,
                Some(collect_frame),
                (&mut frames as *mut Vec<ErrorFrame>).cast(),
            )
        };
        // Put the copy back so reading leaves the stack as it was; clearing
        // is left to `clear_error_stack`. H5Eset_current_stack closes `stack`.
        // SAFETY: `stack` was returned by H5Eget_current_stack above.
        if unsafe { H5Eset_current_stack(stack) } < 0 {
            // SAFETY: as above; not consumed by the failed restore.
            unsafe { H5Eclose_stack(stack) };
        }
        status(walked)?;
        Ok(frames)
    }

    fn clear_error_stack(&self) {
        // SAFETY: clears the default stack of this thread.
        unsafe { H5Eclear2(H5E_DEFAULT) };
    }

    fn create_file(&self, path: &str, mode: FileMode) -> Result<Hid, CallFailed> {
        let flags = match mode {
            FileMode::Truncate => H5F_ACC_TRUNC,
            FileMode::Exclusive => H5F_ACC_EXCL,
            FileMode::ReadOnly | FileMode::ReadWrite => return Err(CallFailed),
        };
        let name = c_string(path)?;
        // SAFETY: `name` is NUL-terminated and outlives the call.
        ident(unsafe { H5Fcreate(name.as_ptr(), flags, H5P_DEFAULT, H5P_DEFAULT) })
    }

    fn open_file(&self, path: &str, mode: FileMode) -> Result<Hid, CallFailed> {
        let flags = match mode {
            FileMode::ReadOnly => H5F_ACC_RDONLY,
            FileMode::ReadWrite => H5F_ACC_RDWR,
            FileMode::Truncate | FileMode::Exclusive => return Err(CallFailed),
        };
        let name = c_string(path)?;
        // SAFETY: as above.
        ident(unsafe { H5Fopen(name.as_ptr(), flags, H5P_DEFAULT) })
    }

    fn create_group(&self, loc: Hid, name: &str) -> Result<Hid, CallFailed> {
        let name = c_string(name)?;
        // SAFETY: as above.
        ident(unsafe { H5Gcreate2(loc, name.as_ptr(), H5P_DEFAULT, H5P_DEFAULT, H5P_DEFAULT) })
    }

    fn open_group(&self, loc: Hid, name: &str) -> Result<Hid, CallFailed> {
        let name = c_string(name)?;
        // SAFETY: as above.
        ident(unsafe { H5Gopen2(loc, name.as_ptr(), H5P_DEFAULT) })
    }

    fn create_simple_dataspace(&self, dims: &[u64]) -> Result<Hid, CallFailed> {
        let rank = c_int::try_from(dims.len()).map_err(|_| CallFailed)?;
        // SAFETY: `dims` holds `rank` elements; null maxdims means "same as dims".
        ident(unsafe { H5Screate_simple(rank, dims.as_ptr(), ptr::null()) })
    }

    fn open_dataset(&self, loc: Hid, name: &str) -> Result<Hid, CallFailed> {
        let name = c_string(name)?;
        // SAFETY: as above.
        ident(unsafe { H5Dopen2(loc, name.as_ptr(), H5P_DEFAULT) })
    }
}
