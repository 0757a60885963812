//! VLM, the engine's broadcast and video-on-demand management console.

use libc::{c_int, c_void};

use crate::error::{Error, Result};
use crate::event::{Event, EventHub, EventSource, EventType};
use crate::factory::{Capability, FactoryArg, FactoryBuilt, expect_none};
use crate::ffi::libvlc_instance_t;
use crate::handle::{LibraryHandle, NativePointer, NativeRef, ReferenceCount};
use crate::util::{ArgVector, to_cstring};

/// A named broadcast: one input streamed to one output chain.
#[derive(Debug, Clone, Default)]
pub struct Broadcast<'a> {
    pub name: &'a str,
    pub input: &'a str,
    /// Stream output chain, e.g. `#transcode{vcodec=h264}:rtp{sdp=rtsp://:8554/}`.
    pub output: &'a str,
    pub options: &'a [&'a str],
    pub enabled: bool,
    pub looped: bool,
}

/// The management console of one library instance.
///
/// Shares the instance handle with the library context and holds its own
/// engine reference on it, so the console stays valid even if the context
/// is released first.
///
/// An instance has a single VLM. Consoles built over the same instance
/// share it, and it is torn down when the last of them is released.
/// [`LibraryContext::management_console`](crate::LibraryContext::management_console)
/// hands out one cached console.
pub struct ManagementConsole {
    events: EventHub,
    handle: NativeRef<libvlc_instance_t>,
    library: LibraryHandle,
}

impl ManagementConsole {
    pub fn library(&self) -> &LibraryHandle {
        &self.library
    }

    pub fn add_broadcast(&self, broadcast: &Broadcast<'_>) -> Result<()> {
        let instance = self.handle.get()?;
        let name = to_cstring(broadcast.name, "name")?;
        let input = to_cstring(broadcast.input, "input")?;
        let output = to_cstring(broadcast.output, "output")?;
        let options = ArgVector::new(broadcast.options, "options")?;
        let status = unsafe {
            (self.library.api().symbols().vlm_add_broadcast)(
                instance,
                name.as_ptr(),
                input.as_ptr(),
                output.as_ptr(),
                options.argc(),
                options.argv(),
                broadcast.enabled as c_int,
                broadcast.looped as c_int,
            )
        };
        check(status, "libvlc_vlm_add_broadcast")?;
        tracing::debug!(name = broadcast.name, "vlm broadcast added");
        Ok(())
    }

    pub fn play(&self, name: &str) -> Result<()> {
        self.command(name, self.library.api().symbols().vlm_play_media, "libvlc_vlm_play_media")
    }

    pub fn stop(&self, name: &str) -> Result<()> {
        self.command(name, self.library.api().symbols().vlm_stop_media, "libvlc_vlm_stop_media")
    }

    pub fn pause(&self, name: &str) -> Result<()> {
        self.command(name, self.library.api().symbols().vlm_pause_media, "libvlc_vlm_pause_media")
    }

    /// Remove a broadcast or VoD entry.
    pub fn delete(&self, name: &str) -> Result<()> {
        self.command(name, self.library.api().symbols().vlm_del_media, "libvlc_vlm_del_media")
    }

    fn command(
        &self,
        name: &str,
        call: unsafe extern "C" fn(*mut libvlc_instance_t, *const libc::c_char) -> c_int,
        operation: &'static str,
    ) -> Result<()> {
        let instance = self.handle.get()?;
        let name = to_cstring(name, "name")?;
        check(unsafe { call(instance, name.as_ptr()) }, operation)
    }
}

fn check(status: c_int, operation: &'static str) -> Result<()> {
    if status == 0 {
        Ok(())
    } else {
        Err(Error::CreationFailed { operation })
    }
}

impl FactoryBuilt for ManagementConsole {
    const CAPABILITY: Capability = Capability::ManagementConsole;

    fn construct(library: &LibraryHandle, args: &[FactoryArg<'_>]) -> Result<Self> {
        expect_none(args)?;
        let instance = library.get()?;
        let api = library.api();
        let s = api.symbols();
        unsafe { (s.retain)(instance) };
        let handle = NativeRef::from_raw(api.clone(), instance, "vlm", Some(s.retain), s.release)
            .ok_or(Error::CreationFailed {
                operation: "libvlc_retain",
            })?;
        library.open_console();
        Ok(Self {
            events: EventHub::new(api.clone()),
            handle,
            library: library.clone(),
        })
    }
}

impl NativePointer for ManagementConsole {
    fn pointer(&self) -> *mut c_void {
        self.handle.as_ptr().cast()
    }
}

impl ReferenceCount for ManagementConsole {
    fn add_ref(&self) -> Result<()> {
        self.handle.add_ref()
    }

    fn release(&mut self) {
        let Ok(instance) = self.handle.get() else {
            return;
        };
        self.events.detach_all();
        if self.library.close_console() {
            unsafe { (self.library.api().symbols().vlm_release)(instance) };
        }
        self.handle.release();
    }
}

impl Drop for ManagementConsole {
    fn drop(&mut self) {
        self.release();
    }
}

impl EventSource for ManagementConsole {
    fn on<F>(&mut self, event: EventType, handler: F) -> Result<()>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let instance = self.handle.get()?;
        let manager = unsafe { (self.library.api().symbols().vlm_get_event_manager)(instance) };
        unsafe { self.events.attach(manager, event, Box::new(handler)) }
    }
}

impl std::fmt::Debug for ManagementConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagementConsole")
            .field("handle", &self.handle)
            .finish()
    }
}
