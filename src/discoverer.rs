//! Media discovery services (UPnP, SAP, local directories, ...).

use libc::c_void;

use crate::error::{Error, Result};
use crate::factory::{Capability, FactoryArg, FactoryBuilt, expect_name};
use crate::ffi::libvlc_media_discoverer_t;
use crate::handle::{LibraryHandle, NativePointer, NativeRef, ReferenceCount};
use crate::media::MediaList;
use crate::util::to_cstring;

/// A running discovery service.
///
/// The service is started on construction and stopped before its handle
/// is released. Found items show up in [`MediaDiscoverer::media_list`],
/// whose events report additions and removals.
pub struct MediaDiscoverer {
    handle: NativeRef<libvlc_media_discoverer_t>,
    library: LibraryHandle,
    name: String,
}

impl MediaDiscoverer {
    pub fn library(&self) -> &LibraryHandle {
        &self.library
    }

    /// The service name this discoverer was created for.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> Result<bool> {
        let this = self.handle.get()?;
        Ok(unsafe { (self.library.api().symbols().media_discoverer_is_running)(this) } != 0)
    }

    pub fn stop(&self) -> Result<()> {
        let this = self.handle.get()?;
        unsafe { (self.library.api().symbols().media_discoverer_stop)(this) };
        Ok(())
    }

    /// The list the service fills. Each call returns a new reference.
    pub fn media_list(&self) -> Result<MediaList> {
        let this = self.handle.get()?;
        let raw = unsafe { (self.library.api().symbols().media_discoverer_media_list)(this) };
        MediaList::from_raw(&self.library, raw)
    }
}

impl FactoryBuilt for MediaDiscoverer {
    const CAPABILITY: Capability = Capability::MediaDiscoverer;

    fn construct(library: &LibraryHandle, args: &[FactoryArg<'_>]) -> Result<Self> {
        let name = expect_name(args)?;
        let c_name = to_cstring(name, "name")?;
        let api = library.api();
        let s = api.symbols();
        let instance = library.get()?;
        let raw = unsafe { (s.media_discoverer_new)(instance, c_name.as_ptr()) };
        let handle = NativeRef::from_raw(
            api.clone(),
            raw,
            "media discoverer",
            None,
            s.media_discoverer_release,
        )
        .ok_or(Error::CreationFailed {
            operation: "libvlc_media_discoverer_new",
        })?;
        if unsafe { (s.media_discoverer_start)(handle.as_ptr()) } != 0 {
            // Dropping `handle` releases the never-started service.
            return Err(Error::CreationFailed {
                operation: "libvlc_media_discoverer_start",
            });
        }
        tracing::debug!(service = name, "media discoverer started");
        Ok(Self {
            handle,
            library: library.clone(),
            name: name.to_string(),
        })
    }
}

impl NativePointer for MediaDiscoverer {
    fn pointer(&self) -> *mut c_void {
        self.handle.as_ptr().cast()
    }
}

impl ReferenceCount for MediaDiscoverer {
    /// Discoverers are not reference counted by the engine.
    fn add_ref(&self) -> Result<()> {
        self.handle.add_ref()
    }

    fn release(&mut self) {
        if let Ok(this) = self.handle.get() {
            unsafe { (self.library.api().symbols().media_discoverer_stop)(this) };
        }
        self.handle.release();
    }
}

impl Drop for MediaDiscoverer {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for MediaDiscoverer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaDiscoverer")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .finish()
    }
}
