//! The library context: boots the engine, owns the root instance and
//! creates every other wrapper through the object factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use libc::c_void;
use serde::Serialize;

use crate::api::LibVlc;
use crate::callback::{ExitBridge, PinnedCallbacks, exit_trampoline};
use crate::config::EngineConfig;
use crate::discoverer::MediaDiscoverer;
use crate::error::{Error, Result};
use crate::factory::{FactoryArg, ObjectFactory};
use crate::ffi::libvlc_instance_t;
use crate::handle::{LibraryHandle, NativePointer, NativeRef, ReferenceCount};
use crate::list::{self, AudioOutputDeviceInfo, AudioOutputModuleInfo, FilterInfo};
use crate::media::{Media, MediaKind, MediaList};
use crate::player::{MediaListPlayer, PlayerKind};
use crate::util::{ArgVector, cstr_to_string, take_native_string, to_cstring};
use crate::vlm::ManagementConsole;

/// Lifecycle of a [`LibraryContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContextState {
    Uninitialized,
    Initializing,
    Ready,
    Disposed,
}

/// Makes a directory current for its lifetime, restoring the previous one
/// on drop.
struct CurrentDirGuard {
    previous: Option<PathBuf>,
}

impl CurrentDirGuard {
    fn enter(dir: Option<&Path>) -> Result<Self> {
        let Some(dir) = dir else {
            return Ok(Self { previous: None });
        };
        let previous = std::env::current_dir()?;
        std::env::set_current_dir(dir)?;
        tracing::debug!(dir = %dir.display(), "switched to module directory");
        Ok(Self {
            previous: Some(previous),
        })
    }
}

impl Drop for CurrentDirGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            if let Err(e) = std::env::set_current_dir(&previous) {
                tracing::warn!(
                    dir = %previous.display(),
                    "failed to restore working directory: {e}"
                );
            }
        }
    }
}

/// Entry point of the facade: one booted libvlc instance.
///
/// Wrappers created here hold their own engine references and may outlive
/// the context, but they should be dropped before it where possible.
pub struct LibraryContext {
    vlm: Option<ManagementConsole>,
    pins: PinnedCallbacks,
    library: LibraryHandle,
    state: ContextState,
    exit_handler: bool,
}

impl LibraryContext {
    /// Load libvlc as configured and boot it.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::bootstrap(&config, |config| {
            LibVlc::load(config.library_path.as_deref()).map(Arc::new)
        })
    }

    /// Boot an already bound engine. `config.library_path` is ignored.
    pub fn with_api(api: Arc<LibVlc>, config: EngineConfig) -> Result<Self> {
        Self::bootstrap(&config, move |_| Ok(api))
    }

    fn bootstrap(
        config: &EngineConfig,
        bind: impl FnOnce(&EngineConfig) -> Result<Arc<LibVlc>>,
    ) -> Result<Self> {
        tracing::info!(state = ?ContextState::Initializing, args = ?config.args, "booting libvlc");
        let args = ArgVector::new(&config.args, "args")?;

        let cwd = CurrentDirGuard::enter(config.module_path.as_deref())?;
        let api = bind(config)?;
        let s = api.symbols();
        let raw = unsafe { (s.new)(args.argc(), args.argv()) };
        drop(cwd);

        let handle = NativeRef::from_raw(api.clone(), raw, "library", Some(s.retain), s.release)
            .ok_or(Error::InitializationFailed { argc: args.len() })?;

        tracing::info!(state = ?ContextState::Ready, "libvlc ready");
        Ok(Self {
            vlm: None,
            pins: PinnedCallbacks::new(),
            library: LibraryHandle::new(handle),
            state: ContextState::Ready,
            exit_handler: false,
        })
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// The instance handle passed to every factory constructor. Clones
    /// turn stale when the context is disposed.
    pub fn library(&self) -> &LibraryHandle {
        &self.library
    }

    fn instance(&self) -> Result<*mut libvlc_instance_t> {
        self.library.get()
    }

    pub fn create_player<T: PlayerKind>(&self) -> Result<T> {
        self.instance()?;
        ObjectFactory::build::<T>(&self.library, &[])
    }

    /// Create a media item of kind `T` from `input` and apply `options`.
    ///
    /// Options are validated before the media is created.
    pub fn create_media<T: MediaKind, S: AsRef<str>>(
        &self,
        input: &str,
        options: &[S],
    ) -> Result<T> {
        self.instance()?;
        for option in options {
            to_cstring(option.as_ref(), "option")?;
        }
        let media = ObjectFactory::build::<T>(&self.library, &[FactoryArg::Input(input)])?;
        media.media().add_options(options)?;
        Ok(media)
    }

    /// Create a list holding one media per entry of `items`, in order, each
    /// with `options` applied.
    pub fn create_media_list<S: AsRef<str>, O: AsRef<str>>(
        &self,
        items: &[S],
        options: &[O],
    ) -> Result<MediaList> {
        let mut list = self.create_media_list_empty()?;
        for item in items {
            let media = self.create_media::<Media, O>(item.as_ref(), options)?;
            list.add(media)?;
        }
        Ok(list)
    }

    pub fn create_media_list_empty(&self) -> Result<MediaList> {
        self.instance()?;
        ObjectFactory::build::<MediaList>(&self.library, &[])
    }

    pub fn create_media_list_player(&self, list: &MediaList) -> Result<MediaListPlayer> {
        self.instance()?;
        ObjectFactory::build::<MediaListPlayer>(&self.library, &[FactoryArg::MediaList(list)])
    }

    /// Start the discovery service `name`, e.g. `upnp` or `sap`.
    pub fn create_media_discoverer(&self, name: &str) -> Result<MediaDiscoverer> {
        self.instance()?;
        ObjectFactory::build::<MediaDiscoverer>(&self.library, &[FactoryArg::Name(name)])
    }

    /// The VLM console of this instance, created on first use.
    pub fn management_console(&mut self) -> Result<&mut ManagementConsole> {
        self.instance()?;
        if self.vlm.is_none() {
            self.vlm = Some(ObjectFactory::build::<ManagementConsole>(&self.library, &[])?);
        }
        self.vlm.as_mut().ok_or(Error::StaleHandle { kind: "vlm" })
    }

    /// The libvlc version string, e.g. `3.0.20 Vetinari`.
    pub fn version(&self) -> String {
        let raw = unsafe { (self.library.api().symbols().get_version)() };
        unsafe { cstr_to_string(raw) }.unwrap_or_default()
    }

    /// The engine clock in microseconds.
    pub fn clock(&self) -> i64 {
        unsafe { (self.library.api().symbols().clock)() }
    }

    /// Microseconds until `pts` on the engine clock. Negative when past.
    pub fn delay(&self, pts: i64) -> i64 {
        let s = self.library.api().symbols();
        match s.delay {
            Some(delay) => unsafe { delay(pts) },
            None => pts.saturating_sub(unsafe { (s.clock)() }),
        }
    }

    pub fn audio_filters(&self) -> Result<Vec<FilterInfo>> {
        let instance = self.instance()?;
        let s = self.library.api().symbols();
        let head = unsafe { (s.audio_filter_list_get)(instance) };
        Ok(unsafe { list::collect(head, s.module_description_list_release) })
    }

    pub fn video_filters(&self) -> Result<Vec<FilterInfo>> {
        let instance = self.instance()?;
        let s = self.library.api().symbols();
        let head = unsafe { (s.video_filter_list_get)(instance) };
        Ok(unsafe { list::collect(head, s.module_description_list_release) })
    }

    pub fn audio_output_modules(&self) -> Result<Vec<AudioOutputModuleInfo>> {
        let instance = self.instance()?;
        let s = self.library.api().symbols();
        let head = unsafe { (s.audio_output_list_get)(instance) };
        Ok(unsafe { list::collect(head, s.audio_output_list_release) })
    }

    /// Devices of the audio output module `module`.
    ///
    /// Uses the per-index queries where the engine still exports them and
    /// the device list otherwise.
    pub fn audio_output_devices(&self, module: &str) -> Result<Vec<AudioOutputDeviceInfo>> {
        let instance = self.instance()?;
        let module = to_cstring(module, "module")?;
        let s = self.library.api().symbols();

        if let (Some(count), Some(longname), Some(id)) = (
            s.audio_output_device_count,
            s.audio_output_device_longname,
            s.audio_output_device_id,
        ) {
            let total = unsafe { count(instance, module.as_ptr()) }.max(0);
            let devices = (0..total)
                .map(|i| unsafe {
                    AudioOutputDeviceInfo {
                        longname: take_native_string(s, longname(instance, module.as_ptr(), i))
                            .unwrap_or_default(),
                        id: take_native_string(s, id(instance, module.as_ptr(), i))
                            .unwrap_or_default(),
                    }
                })
                .collect();
            return Ok(devices);
        }

        if let (Some(get), Some(release)) =
            (s.audio_output_device_list_get, s.audio_output_device_list_release)
        {
            return Ok(unsafe { list::collect(get(instance, module.as_ptr()), release) });
        }

        tracing::warn!("libvlc exports no audio output device enumeration");
        Ok(Vec::new())
    }

    /// Call `handler` when the engine wants the application to exit.
    ///
    /// Replacing a handler keeps the previous adapter pinned until the
    /// context is disposed.
    pub fn set_exit_handler<F>(&mut self, handler: F) -> Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        let instance = self.instance()?;
        let Some(set_exit_handler) = self.library.api().symbols().set_exit_handler else {
            return Err(Error::InvalidArgument {
                param: "handler",
                reason: "libvlc_set_exit_handler is not exported".to_string(),
            });
        };
        let opaque = self.pins.pin(
            "exit",
            ExitBridge {
                handler: Box::new(handler),
            },
        );
        unsafe { set_exit_handler(instance, Some(exit_trampoline), opaque.cast::<c_void>()) };
        self.exit_handler = true;
        Ok(())
    }

    /// Release the instance. Idempotent; every later call fails with
    /// `StaleHandle`.
    pub fn dispose(&mut self) {
        if self.state == ContextState::Disposed {
            return;
        }
        if let Ok(instance) = self.library.get() {
            if self.exit_handler {
                if let Some(set_exit_handler) = self.library.api().symbols().set_exit_handler {
                    unsafe { set_exit_handler(instance, None, std::ptr::null_mut()) };
                }
                self.exit_handler = false;
            }
        }
        self.vlm = None;
        self.library.release();
        self.pins.clear();
        self.state = ContextState::Disposed;
        tracing::info!(state = ?self.state, "libvlc context disposed");
    }
}

impl NativePointer for LibraryContext {
    fn pointer(&self) -> *mut c_void {
        self.library.as_ptr().cast()
    }
}

impl ReferenceCount for LibraryContext {
    fn add_ref(&self) -> Result<()> {
        self.library.add_ref()
    }

    fn release(&mut self) {
        self.dispose();
    }
}

impl Drop for LibraryContext {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for LibraryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryContext")
            .field("state", &self.state)
            .field("library", &self.library)
            .field("pins", &self.pins)
            .finish()
    }
}
