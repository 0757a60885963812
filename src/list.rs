//! Owned copies of the engine's linked-list enumerations.
//!
//! Every view fetches a fresh native list, copies each node into an owned
//! record and releases the list exactly once, on every exit path. A null
//! head is an empty list.

use serde::Serialize;

use crate::ffi::{libvlc_audio_output_device_t, libvlc_audio_output_t, libvlc_module_description_t};
use crate::util::cstr_to_string;

/// An audio or video filter module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterInfo {
    pub name: String,
    pub shortname: String,
    pub longname: String,
    pub help: String,
}

/// An audio output module (`pulse`, `alsa`, `directsound`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioOutputModuleInfo {
    pub name: String,
    pub description: String,
}

/// A device of one audio output module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioOutputDeviceInfo {
    pub longname: String,
    pub id: String,
}

/// A node type of a native singly linked list.
pub(crate) trait NativeNode {
    type Record;

    /// # Safety
    ///
    /// `node` must point to a valid, fully initialised node.
    unsafe fn next(node: *const Self) -> *mut Self;

    /// # Safety
    ///
    /// Same as [`NativeNode::next`].
    unsafe fn copy(node: *const Self) -> Self::Record;
}

unsafe fn owned(ptr: *const libc::c_char) -> String {
    unsafe { cstr_to_string(ptr) }.unwrap_or_default()
}

impl NativeNode for libvlc_module_description_t {
    type Record = FilterInfo;

    unsafe fn next(node: *const Self) -> *mut Self {
        unsafe { (*node).p_next }
    }

    unsafe fn copy(node: *const Self) -> FilterInfo {
        let node = unsafe { &*node };
        unsafe {
            FilterInfo {
                name: owned(node.psz_name),
                shortname: owned(node.psz_shortname),
                longname: owned(node.psz_longname),
                help: owned(node.psz_help),
            }
        }
    }
}

impl NativeNode for libvlc_audio_output_t {
    type Record = AudioOutputModuleInfo;

    unsafe fn next(node: *const Self) -> *mut Self {
        unsafe { (*node).p_next }
    }

    unsafe fn copy(node: *const Self) -> AudioOutputModuleInfo {
        let node = unsafe { &*node };
        unsafe {
            AudioOutputModuleInfo {
                name: owned(node.psz_name),
                description: owned(node.psz_description),
            }
        }
    }
}

impl NativeNode for libvlc_audio_output_device_t {
    type Record = AudioOutputDeviceInfo;

    unsafe fn next(node: *const Self) -> *mut Self {
        unsafe { (*node).p_next }
    }

    unsafe fn copy(node: *const Self) -> AudioOutputDeviceInfo {
        let node = unsafe { &*node };
        unsafe {
            AudioOutputDeviceInfo {
                longname: owned(node.psz_description),
                id: owned(node.psz_device),
            }
        }
    }
}

/// Scope guard owning a fetched native list head.
struct ListGuard<N> {
    head: *mut N,
    release: unsafe extern "C" fn(*mut N),
}

impl<N> Drop for ListGuard<N> {
    fn drop(&mut self) {
        if !self.head.is_null() {
            unsafe { (self.release)(self.head) };
        }
    }
}

/// Copy every node reachable from `head`, then release the list.
///
/// # Safety
///
/// `head` must be null or the head of a list returned by the engine that
/// `release` frees, not yet released.
pub(crate) unsafe fn collect<N: NativeNode>(
    head: *mut N,
    release: unsafe extern "C" fn(*mut N),
) -> Vec<N::Record> {
    let guard = ListGuard { head, release };
    let mut records = Vec::new();
    let mut node = guard.head;
    while !node.is_null() {
        unsafe {
            records.push(N::copy(node));
            node = N::next(node);
        }
    }
    records
}
