//! Ownership token for a reference-counted libvlc handle.

use std::ptr::NonNull;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use libc::c_void;

use crate::api::LibVlc;
use crate::error::{Error, Result};
use crate::ffi::libvlc_instance_t;

/// Native retain or release entry point for handles of type `T`.
pub type RefFn<T> = unsafe extern "C" fn(*mut T);

/// Explicit reference counting against the engine's own counter.
pub trait ReferenceCount {
    /// Increment the engine's reference count for the wrapped handle.
    fn add_ref(&self) -> Result<()>;

    /// Drop this wrapper's reference. Idempotent.
    ///
    /// Wrappers with pinned callbacks first tell the engine to stop
    /// invoking them. Any use after release fails with
    /// [`Error::StaleHandle`].
    fn release(&mut self);
}

/// Read-only access to the wrapped native handle.
///
/// The returned pointer must not be kept beyond the wrapper's lifetime.
pub trait NativePointer {
    fn pointer(&self) -> *mut c_void;
}

/// The primary owner of one native handle.
///
/// Holds the engine's reference taken at construction and gives it back
/// exactly once, either through [`NativeRef::release`] or on drop. After
/// release every access fails with [`Error::StaleHandle`] instead of
/// reaching the engine.
pub struct NativeRef<T> {
    ptr: NonNull<T>,
    api: Arc<LibVlc>,
    retain: Option<RefFn<T>>,
    release: RefFn<T>,
    released: AtomicBool,
    kind: &'static str,
}

// libvlc objects are internally locked and may be used from any thread.
unsafe impl<T> Send for NativeRef<T> {}
unsafe impl<T> Sync for NativeRef<T> {}

impl<T> NativeRef<T> {
    /// Take ownership of a handle returned by a native constructor.
    ///
    /// Returns `None` when `ptr` is null.
    pub fn from_raw(
        api: Arc<LibVlc>,
        ptr: *mut T,
        kind: &'static str,
        retain: Option<RefFn<T>>,
        release: RefFn<T>,
    ) -> Option<Self> {
        let ptr = NonNull::new(ptr)?;
        tracing::debug!(kind, ptr = ?ptr, "native handle acquired");
        Some(Self {
            ptr,
            api,
            retain,
            release,
            released: AtomicBool::new(false),
            kind,
        })
    }

    /// The raw handle, or `StaleHandle` once released.
    pub fn get(&self) -> Result<*mut T> {
        if self.released.load(Ordering::Acquire) {
            return Err(Error::StaleHandle { kind: self.kind });
        }
        Ok(self.ptr.as_ptr())
    }

    /// The raw handle regardless of release state. Never dereference it.
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    pub fn api(&self) -> &Arc<LibVlc> {
        &self.api
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Increment the engine-side reference count.
    pub fn add_ref(&self) -> Result<()> {
        let ptr = self.get()?;
        let Some(retain) = self.retain else {
            return Err(Error::InvalidArgument {
                param: "handle",
                reason: format!("{} handles are not reference counted", self.kind),
            });
        };
        unsafe { retain(ptr) };
        Ok(())
    }

    /// Give the owned reference back to the engine.
    ///
    /// Only the first call reaches the engine; later calls are logged
    /// no-ops. This is the single place where a use after release is
    /// swallowed rather than reported.
    pub fn release(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            tracing::warn!(kind = self.kind, "suppressed release of an already released handle");
            return;
        }
        tracing::debug!(kind = self.kind, ptr = ?self.ptr, "native handle released");
        unsafe { (self.release)(self.ptr.as_ptr()) };
    }
}

impl<T> Drop for NativeRef<T> {
    fn drop(&mut self) {
        if !self.is_released() {
            self.release();
        }
    }
}

struct Instance {
    handle: NativeRef<libvlc_instance_t>,
    consoles: AtomicUsize,
}

/// Shared view of the root libvlc instance.
///
/// Passed to every constructor the object factory runs. Every clone
/// shares the library context's reference, so once the context is
/// disposed all clones report [`Error::StaleHandle`] instead of reaching
/// the released instance. Native constructors retain the instance
/// themselves.
#[derive(Clone)]
pub struct LibraryHandle {
    inner: Arc<Instance>,
}

impl LibraryHandle {
    pub(crate) fn new(handle: NativeRef<libvlc_instance_t>) -> Self {
        Self {
            inner: Arc::new(Instance {
                handle,
                consoles: AtomicUsize::new(0),
            }),
        }
    }

    pub fn api(&self) -> &Arc<LibVlc> {
        self.inner.handle.api()
    }

    /// The instance, or `StaleHandle` once the owning context is disposed.
    pub fn get(&self) -> Result<*mut libvlc_instance_t> {
        self.inner.handle.get()
    }

    /// The instance regardless of release state. Never dereference it.
    pub fn as_ptr(&self) -> *mut libvlc_instance_t {
        self.inner.handle.as_ptr()
    }

    pub fn is_released(&self) -> bool {
        self.inner.handle.is_released()
    }

    pub(crate) fn add_ref(&self) -> Result<()> {
        self.inner.handle.add_ref()
    }

    pub(crate) fn release(&self) {
        self.inner.handle.release();
    }

    /// Register one more management console over this instance.
    pub(crate) fn open_console(&self) {
        self.inner.consoles.fetch_add(1, Ordering::AcqRel);
    }

    /// Unregister a console. True when it was the last one, which then
    /// owns tearing down the instance's VLM.
    pub(crate) fn close_console(&self) -> bool {
        self.inner.consoles.fetch_sub(1, Ordering::AcqRel) == 1
    }
}

impl NativePointer for LibraryHandle {
    fn pointer(&self) -> *mut c_void {
        self.as_ptr().cast()
    }
}

impl std::fmt::Debug for LibraryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LibraryHandle").field(&self.inner.handle).finish()
    }
}

impl<T> std::fmt::Debug for NativeRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeRef")
            .field("kind", &self.kind)
            .field("ptr", &self.ptr)
            .field("released", &self.is_released())
            .finish()
    }
}
