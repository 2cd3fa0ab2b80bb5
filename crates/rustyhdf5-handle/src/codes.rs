//! Error-stack category codes used by [`MemoryLibrary`](crate::MemoryLibrary).
//!
//! The C library hands out major/minor codes as runtime identifiers. The
//! in-memory library uses the fixed values below, grouped the same way, and
//! the same message text so diagnostics read like the real thing. Zero is
//! reserved for "unmapped".

use crate::Hid;

/// Invalid arguments to routine.
pub const MAJOR_ARGS: Hid = 1;
/// Object ID.
pub const MAJOR_ID: Hid = 2;
/// File accessibility.
pub const MAJOR_FILE: Hid = 3;
/// Symbol table.
pub const MAJOR_SYM: Hid = 4;
/// Dataset.
pub const MAJOR_DATASET: Hid = 5;
/// Dataspace.
pub const MAJOR_DATASPACE: Hid = 6;
/// Error API.
pub const MAJOR_ERROR: Hid = 7;

/// Unable to open file.
pub const MINOR_CANTOPENFILE: Hid = 101;
/// Unable to create file.
pub const MINOR_CANTCREATE: Hid = 102;
/// File already exists.
pub const MINOR_FILEEXISTS: Hid = 103;
/// Object not found.
pub const MINOR_NOTFOUND: Hid = 104;
/// Object already exists.
pub const MINOR_EXISTS: Hid = 105;
/// Can't open object.
pub const MINOR_CANTOPENOBJ: Hid = 106;
/// Unable to find ID information (already closed?).
pub const MINOR_BADID: Hid = 107;
/// Inappropriate type.
pub const MINOR_BADTYPE: Hid = 108;
/// Can't increment reference count.
pub const MINOR_CANTINC: Hid = 109;
/// Can't decrement reference count.
pub const MINOR_CANTDEC: Hid = 110;
/// Can't get value.
pub const MINOR_CANTGET: Hid = 111;
/// Can't close object.
pub const MINOR_CANTCLOSEOBJ: Hid = 112;
/// Out of range.
pub const MINOR_BADRANGE: Hid = 113;
/// Feature is unsupported.
pub const MINOR_UNSUPPORTED: Hid = 114;

/// Message text for a major code.
pub fn major_message(code: Hid) -> &'static str {
    match code {
        MAJOR_ARGS => "Invalid arguments to routine",
        MAJOR_ID => "Object ID",
        MAJOR_FILE => "File accessibility",
        MAJOR_SYM => "Symbol table",
        MAJOR_DATASET => "Dataset",
        MAJOR_DATASPACE => "Dataspace",
        MAJOR_ERROR => "Error API",
        _ => "Unknown major error",
    }
}

/// Message text for a minor code.
pub fn minor_message(code: Hid) -> &'static str {
    match code {
        MINOR_CANTOPENFILE => "Unable to open file",
        MINOR_CANTCREATE => "Unable to create file",
        MINOR_FILEEXISTS => "File already exists",
        MINOR_NOTFOUND => "Object not found",
        MINOR_EXISTS => "Object already exists",
        MINOR_CANTOPENOBJ => "Can't open object",
        MINOR_BADID => "Unable to find ID information (already closed?)",
        MINOR_BADTYPE => "Inappropriate type",
        MINOR_CANTINC => "Can't increment reference count",
        MINOR_CANTDEC => "Can't decrement reference count",
        MINOR_CANTGET => "Can't get value",
        MINOR_CANTCLOSEOBJ => "Can't close object",
        MINOR_BADRANGE => "Out of range",
        MINOR_UNSUPPORTED => "Feature is unsupported",
        _ => "Unknown minor error",
    }
}
