//! String marshaling between Rust and the engine's C strings.

use std::ffi::{CStr, CString};

use libc::{c_char, c_int, c_void};

use crate::api::Symbols;
use crate::error::{Error, Result};

/// Copy a borrowed C string owned by the engine.
///
/// Returns `None` for a null pointer. Invalid UTF-8 is replaced lossily.
///
/// # Safety
///
/// `ptr` must be null or point to a valid null-terminated C string.
pub unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let cstr = unsafe { CStr::from_ptr(ptr) };
    Some(cstr.to_string_lossy().into_owned())
}

/// Copy a C string the engine allocated for us, then free it with
/// `libvlc_free`.
///
/// # Safety
///
/// `ptr` must be null or a string allocated by the engine and not yet freed.
pub unsafe fn take_native_string(api: &Symbols, ptr: *mut c_char) -> Option<String> {
    let value = unsafe { cstr_to_string(ptr) };
    if !ptr.is_null() {
        unsafe { (api.free)(ptr as *mut c_void) };
    }
    value
}

/// Convert a Rust string for a call into the engine.
pub fn to_cstring(value: &str, param: &'static str) -> Result<CString> {
    CString::new(value).map_err(|_| Error::interior_nul(param))
}

/// An owned `argc`/`argv` pair.
///
/// The pointer array borrows the owned strings, so both live exactly as
/// long as this value.
#[derive(Debug)]
pub struct ArgVector {
    _strings: Vec<CString>,
    pointers: Vec<*const c_char>,
}

impl ArgVector {
    pub fn new<S: AsRef<str>>(args: &[S], param: &'static str) -> Result<Self> {
        let strings = args
            .iter()
            .map(|arg| to_cstring(arg.as_ref(), param))
            .collect::<Result<Vec<_>>>()?;
        let pointers = strings.iter().map(|s| s.as_ptr()).collect();
        Ok(Self {
            _strings: strings,
            pointers,
        })
    }

    pub fn argc(&self) -> c_int {
        self.pointers.len() as c_int
    }

    /// Null when empty, as libvlc expects for `argc == 0`.
    pub fn argv(&self) -> *const *const c_char {
        if self.pointers.is_empty() {
            std::ptr::null()
        } else {
            self.pointers.as_ptr()
        }
    }

    pub fn len(&self) -> usize {
        self.pointers.len()
    }
}
