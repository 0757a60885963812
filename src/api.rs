//! Runtime binding of the libvlc entry points.
//!
//! [`LibVlc`] is the table of function pointers every wrapper calls
//! through. It is shared behind an `Arc` so the engine stays mapped until
//! the last wrapper referencing it is gone.

use std::path::{Path, PathBuf};

use libc::{c_char, c_int, c_uint, c_void};
use libloading::Library;

use crate::error::{Error, Result};
use crate::ffi::*;

/// File name probed when no explicit library path is configured.
#[cfg(target_os = "windows")]
pub const DEFAULT_LIBRARY_NAME: &str = "libvlc.dll";
#[cfg(target_os = "macos")]
pub const DEFAULT_LIBRARY_NAME: &str = "libvlc.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const DEFAULT_LIBRARY_NAME: &str = "libvlc.so.5";

/// Resolved libvlc entry points.
///
/// Optional fields cover symbols that only some libvlc releases export.
#[derive(Clone, Copy)]
pub struct Symbols {
    // Instance
    pub new: unsafe extern "C" fn(c_int, *const *const c_char) -> *mut libvlc_instance_t,
    pub retain: unsafe extern "C" fn(*mut libvlc_instance_t),
    pub release: unsafe extern "C" fn(*mut libvlc_instance_t),
    pub get_version: unsafe extern "C" fn() -> *const c_char,
    pub clock: unsafe extern "C" fn() -> i64,
    pub delay: Option<unsafe extern "C" fn(i64) -> i64>,
    pub free: unsafe extern "C" fn(*mut c_void),
    pub set_exit_handler:
        Option<unsafe extern "C" fn(*mut libvlc_instance_t, Option<libvlc_exit_cb>, *mut c_void)>,

    // Module and output enumeration
    pub audio_filter_list_get:
        unsafe extern "C" fn(*mut libvlc_instance_t) -> *mut libvlc_module_description_t,
    pub video_filter_list_get:
        unsafe extern "C" fn(*mut libvlc_instance_t) -> *mut libvlc_module_description_t,
    pub module_description_list_release: unsafe extern "C" fn(*mut libvlc_module_description_t),
    pub audio_output_list_get:
        unsafe extern "C" fn(*mut libvlc_instance_t) -> *mut libvlc_audio_output_t,
    pub audio_output_list_release: unsafe extern "C" fn(*mut libvlc_audio_output_t),
    pub audio_output_device_count:
        Option<unsafe extern "C" fn(*mut libvlc_instance_t, *const c_char) -> c_int>,
    pub audio_output_device_longname:
        Option<unsafe extern "C" fn(*mut libvlc_instance_t, *const c_char, c_int) -> *mut c_char>,
    pub audio_output_device_id:
        Option<unsafe extern "C" fn(*mut libvlc_instance_t, *const c_char, c_int) -> *mut c_char>,
    pub audio_output_device_list_get: Option<
        unsafe extern "C" fn(
            *mut libvlc_instance_t,
            *const c_char,
        ) -> *mut libvlc_audio_output_device_t,
    >,
    pub audio_output_device_list_release:
        Option<unsafe extern "C" fn(*mut libvlc_audio_output_device_t)>,

    // Events
    pub event_attach: unsafe extern "C" fn(
        *mut libvlc_event_manager_t,
        c_int,
        libvlc_callback_t,
        *mut c_void,
    ) -> c_int,
    pub event_detach:
        unsafe extern "C" fn(*mut libvlc_event_manager_t, c_int, libvlc_callback_t, *mut c_void),

    // Media
    pub media_new_location:
        unsafe extern "C" fn(*mut libvlc_instance_t, *const c_char) -> *mut libvlc_media_t,
    pub media_new_path:
        unsafe extern "C" fn(*mut libvlc_instance_t, *const c_char) -> *mut libvlc_media_t,
    pub media_add_option: unsafe extern "C" fn(*mut libvlc_media_t, *const c_char),
    pub media_retain: unsafe extern "C" fn(*mut libvlc_media_t),
    pub media_release: unsafe extern "C" fn(*mut libvlc_media_t),
    pub media_get_mrl: unsafe extern "C" fn(*mut libvlc_media_t) -> *mut c_char,
    pub media_get_state: unsafe extern "C" fn(*mut libvlc_media_t) -> c_int,
    pub media_event_manager:
        unsafe extern "C" fn(*mut libvlc_media_t) -> *mut libvlc_event_manager_t,

    // Media list
    pub media_list_new: unsafe extern "C" fn(*mut libvlc_instance_t) -> *mut libvlc_media_list_t,
    pub media_list_retain: unsafe extern "C" fn(*mut libvlc_media_list_t),
    pub media_list_release: unsafe extern "C" fn(*mut libvlc_media_list_t),
    pub media_list_add_media:
        unsafe extern "C" fn(*mut libvlc_media_list_t, *mut libvlc_media_t) -> c_int,
    pub media_list_count: unsafe extern "C" fn(*mut libvlc_media_list_t) -> c_int,
    pub media_list_lock: unsafe extern "C" fn(*mut libvlc_media_list_t),
    pub media_list_unlock: unsafe extern "C" fn(*mut libvlc_media_list_t),
    pub media_list_event_manager:
        unsafe extern "C" fn(*mut libvlc_media_list_t) -> *mut libvlc_event_manager_t,

    // Media player
    pub media_player_new:
        unsafe extern "C" fn(*mut libvlc_instance_t) -> *mut libvlc_media_player_t,
    pub media_player_retain: unsafe extern "C" fn(*mut libvlc_media_player_t),
    pub media_player_release: unsafe extern "C" fn(*mut libvlc_media_player_t),
    pub media_player_set_media:
        unsafe extern "C" fn(*mut libvlc_media_player_t, *mut libvlc_media_t),
    pub media_player_play: unsafe extern "C" fn(*mut libvlc_media_player_t) -> c_int,
    pub media_player_pause: unsafe extern "C" fn(*mut libvlc_media_player_t),
    pub media_player_stop: unsafe extern "C" fn(*mut libvlc_media_player_t),
    pub media_player_is_playing: unsafe extern "C" fn(*mut libvlc_media_player_t) -> c_int,
    pub media_player_event_manager:
        unsafe extern "C" fn(*mut libvlc_media_player_t) -> *mut libvlc_event_manager_t,

    // Video rendering callbacks
    pub video_set_callbacks: unsafe extern "C" fn(
        *mut libvlc_media_player_t,
        Option<libvlc_video_lock_cb>,
        Option<libvlc_video_unlock_cb>,
        Option<libvlc_video_display_cb>,
        *mut c_void,
    ),
    pub video_set_format:
        unsafe extern "C" fn(*mut libvlc_media_player_t, *const c_char, c_uint, c_uint, c_uint),
    pub video_set_format_callbacks: unsafe extern "C" fn(
        *mut libvlc_media_player_t,
        Option<libvlc_video_format_cb>,
        Option<libvlc_video_cleanup_cb>,
    ),

    // Audio rendering callbacks
    pub audio_set_callbacks: unsafe extern "C" fn(
        *mut libvlc_media_player_t,
        Option<libvlc_audio_play_cb>,
        Option<libvlc_audio_pause_cb>,
        Option<libvlc_audio_resume_cb>,
        Option<libvlc_audio_flush_cb>,
        Option<libvlc_audio_drain_cb>,
        *mut c_void,
    ),
    pub audio_set_volume_callback:
        unsafe extern "C" fn(*mut libvlc_media_player_t, Option<libvlc_audio_set_volume_cb>),
    pub audio_set_format_callbacks: unsafe extern "C" fn(
        *mut libvlc_media_player_t,
        Option<libvlc_audio_setup_cb>,
        Option<libvlc_audio_cleanup_cb>,
    ),
    pub audio_set_format:
        unsafe extern "C" fn(*mut libvlc_media_player_t, *const c_char, c_uint, c_uint),

    // Media list player
    pub media_list_player_new:
        unsafe extern "C" fn(*mut libvlc_instance_t) -> *mut libvlc_media_list_player_t,
    pub media_list_player_retain: unsafe extern "C" fn(*mut libvlc_media_list_player_t),
    pub media_list_player_release: unsafe extern "C" fn(*mut libvlc_media_list_player_t),
    pub media_list_player_set_media_list:
        unsafe extern "C" fn(*mut libvlc_media_list_player_t, *mut libvlc_media_list_t),
    pub media_list_player_set_media_player:
        unsafe extern "C" fn(*mut libvlc_media_list_player_t, *mut libvlc_media_player_t),
    pub media_list_player_play: unsafe extern "C" fn(*mut libvlc_media_list_player_t),
    pub media_list_player_pause: unsafe extern "C" fn(*mut libvlc_media_list_player_t),
    pub media_list_player_stop: unsafe extern "C" fn(*mut libvlc_media_list_player_t),
    pub media_list_player_next: unsafe extern "C" fn(*mut libvlc_media_list_player_t) -> c_int,
    pub media_list_player_event_manager:
        unsafe extern "C" fn(*mut libvlc_media_list_player_t) -> *mut libvlc_event_manager_t,

    // Media discoverer
    pub media_discoverer_new: unsafe extern "C" fn(
        *mut libvlc_instance_t,
        *const c_char,
    ) -> *mut libvlc_media_discoverer_t,
    pub media_discoverer_start: unsafe extern "C" fn(*mut libvlc_media_discoverer_t) -> c_int,
    pub media_discoverer_stop: unsafe extern "C" fn(*mut libvlc_media_discoverer_t),
    pub media_discoverer_release: unsafe extern "C" fn(*mut libvlc_media_discoverer_t),
    pub media_discoverer_is_running: unsafe extern "C" fn(*mut libvlc_media_discoverer_t) -> c_int,
    pub media_discoverer_media_list:
        unsafe extern "C" fn(*mut libvlc_media_discoverer_t) -> *mut libvlc_media_list_t,

    // VLM
    pub vlm_release: unsafe extern "C" fn(*mut libvlc_instance_t),
    pub vlm_add_broadcast: unsafe extern "C" fn(
        *mut libvlc_instance_t,
        *const c_char,
        *const c_char,
        *const c_char,
        c_int,
        *const *const c_char,
        c_int,
        c_int,
    ) -> c_int,
    pub vlm_play_media: unsafe extern "C" fn(*mut libvlc_instance_t, *const c_char) -> c_int,
    pub vlm_stop_media: unsafe extern "C" fn(*mut libvlc_instance_t, *const c_char) -> c_int,
    pub vlm_pause_media: unsafe extern "C" fn(*mut libvlc_instance_t, *const c_char) -> c_int,
    pub vlm_del_media: unsafe extern "C" fn(*mut libvlc_instance_t, *const c_char) -> c_int,
    pub vlm_get_event_manager:
        unsafe extern "C" fn(*mut libvlc_instance_t) -> *mut libvlc_event_manager_t,
}

/// A bound libvlc: the resolved symbol table plus the library keeping it mapped.
pub struct LibVlc {
    symbols: Symbols,
    _library: Option<Library>,
}

impl std::fmt::Debug for LibVlc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibVlc")
            .field("dynamic", &self._library.is_some())
            .finish()
    }
}

impl LibVlc {
    /// Load libvlc from `path`, or from [`DEFAULT_LIBRARY_NAME`] on the
    /// platform search path when `path` is `None`.
    ///
    /// Relative names are resolved by the platform loader, which on Windows
    /// includes the current directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path: PathBuf = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LIBRARY_NAME));

        // SAFETY: Loading libvlc runs its initialisers; no other contract applies.
        let library = unsafe { Library::new(&path) }.map_err(|source| {
            Error::NativeLibraryNotFound {
                path: path.clone(),
                source,
            }
        })?;
        tracing::debug!(path = %path.display(), "libvlc loaded");

        let symbols = unsafe { Symbols::resolve(&library) }?;
        Ok(Self {
            symbols,
            _library: Some(library),
        })
    }

    /// Wrap a symbol table whose functions are linked into the process.
    pub fn from_symbols(symbols: Symbols) -> Self {
        Self {
            symbols,
            _library: None,
        }
    }

    /// The resolved entry points.
    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }
}

/// Resolve a symbol the facade cannot work without.
///
/// # Safety
///
/// `T` must be the function pointer type matching the symbol's C signature.
unsafe fn required<T: Copy>(library: &Library, name: &'static str) -> Result<T> {
    match unsafe { library.get::<T>(name.as_bytes()) } {
        Ok(symbol) => Ok(*symbol),
        Err(source) => Err(Error::MissingSymbol {
            symbol: name,
            source,
        }),
    }
}

/// Resolve a symbol only some libvlc releases export.
///
/// # Safety
///
/// `T` must be the function pointer type matching the symbol's C signature.
unsafe fn optional<T: Copy>(library: &Library, name: &'static str) -> Option<T> {
    match unsafe { library.get::<T>(name.as_bytes()) } {
        Ok(symbol) => Some(*symbol),
        Err(_) => {
            tracing::debug!(symbol = name, "optional libvlc symbol not exported");
            None
        }
    }
}

impl Symbols {
    /// # Safety
    ///
    /// `library` must be a libvlc build whose exports match the declared
    /// signatures.
    unsafe fn resolve(library: &Library) -> Result<Self> {
        unsafe {
            Ok(Self {
                new: required(library, "libvlc_new")?,
                retain: required(library, "libvlc_retain")?,
                release: required(library, "libvlc_release")?,
                get_version: required(library, "libvlc_get_version")?,
                clock: required(library, "libvlc_clock")?,
                delay: optional(library, "libvlc_delay"),
                free: required(library, "libvlc_free")?,
                set_exit_handler: optional(library, "libvlc_set_exit_handler"),

                audio_filter_list_get: required(library, "libvlc_audio_filter_list_get")?,
                video_filter_list_get: required(library, "libvlc_video_filter_list_get")?,
                module_description_list_release: required(
                    library,
                    "libvlc_module_description_list_release",
                )?,
                audio_output_list_get: required(library, "libvlc_audio_output_list_get")?,
                audio_output_list_release: required(library, "libvlc_audio_output_list_release")?,
                audio_output_device_count: optional(library, "libvlc_audio_output_device_count"),
                audio_output_device_longname: optional(
                    library,
                    "libvlc_audio_output_device_longname",
                ),
                audio_output_device_id: optional(library, "libvlc_audio_output_device_id"),
                audio_output_device_list_get: optional(
                    library,
                    "libvlc_audio_output_device_list_get",
                ),
                audio_output_device_list_release: optional(
                    library,
                    "libvlc_audio_output_device_list_release",
                ),

                event_attach: required(library, "libvlc_event_attach")?,
                event_detach: required(library, "libvlc_event_detach")?,

                media_new_location: required(library, "libvlc_media_new_location")?,
                media_new_path: required(library, "libvlc_media_new_path")?,
                media_add_option: required(library, "libvlc_media_add_option")?,
                media_retain: required(library, "libvlc_media_retain")?,
                media_release: required(library, "libvlc_media_release")?,
                media_get_mrl: required(library, "libvlc_media_get_mrl")?,
                media_get_state: required(library, "libvlc_media_get_state")?,
                media_event_manager: required(library, "libvlc_media_event_manager")?,

                media_list_new: required(library, "libvlc_media_list_new")?,
                media_list_retain: required(library, "libvlc_media_list_retain")?,
                media_list_release: required(library, "libvlc_media_list_release")?,
                media_list_add_media: required(library, "libvlc_media_list_add_media")?,
                media_list_count: required(library, "libvlc_media_list_count")?,
                media_list_lock: required(library, "libvlc_media_list_lock")?,
                media_list_unlock: required(library, "libvlc_media_list_unlock")?,
                media_list_event_manager: required(library, "libvlc_media_list_event_manager")?,

                media_player_new: required(library, "libvlc_media_player_new")?,
                media_player_retain: required(library, "libvlc_media_player_retain")?,
                media_player_release: required(library, "libvlc_media_player_release")?,
                media_player_set_media: required(library, "libvlc_media_player_set_media")?,
                media_player_play: required(library, "libvlc_media_player_play")?,
                media_player_pause: required(library, "libvlc_media_player_pause")?,
                media_player_stop: required(library, "libvlc_media_player_stop")?,
                media_player_is_playing: required(library, "libvlc_media_player_is_playing")?,
                media_player_event_manager: required(
                    library,
                    "libvlc_media_player_event_manager",
                )?,

                video_set_callbacks: required(library, "libvlc_video_set_callbacks")?,
                video_set_format: required(library, "libvlc_video_set_format")?,
                video_set_format_callbacks: required(
                    library,
                    "libvlc_video_set_format_callbacks",
                )?,

                audio_set_callbacks: required(library, "libvlc_audio_set_callbacks")?,
                audio_set_volume_callback: required(library, "libvlc_audio_set_volume_callback")?,
                audio_set_format_callbacks: required(
                    library,
                    "libvlc_audio_set_format_callbacks",
                )?,
                audio_set_format: required(library, "libvlc_audio_set_format")?,

                media_list_player_new: required(library, "libvlc_media_list_player_new")?,
                media_list_player_retain: required(library, "libvlc_media_list_player_retain")?,
                media_list_player_release: required(library, "libvlc_media_list_player_release")?,
                media_list_player_set_media_list: required(
                    library,
                    "libvlc_media_list_player_set_media_list",
                )?,
                media_list_player_set_media_player: required(
                    library,
                    "libvlc_media_list_player_set_media_player",
                )?,
                media_list_player_play: required(library, "libvlc_media_list_player_play")?,
                media_list_player_pause: required(library, "libvlc_media_list_player_pause")?,
                media_list_player_stop: required(library, "libvlc_media_list_player_stop")?,
                media_list_player_next: required(library, "libvlc_media_list_player_next")?,
                media_list_player_event_manager: required(
                    library,
                    "libvlc_media_list_player_event_manager",
                )?,

                media_discoverer_new: required(library, "libvlc_media_discoverer_new")?,
                media_discoverer_start: required(library, "libvlc_media_discoverer_start")?,
                media_discoverer_stop: required(library, "libvlc_media_discoverer_stop")?,
                media_discoverer_release: required(library, "libvlc_media_discoverer_release")?,
                media_discoverer_is_running: required(
                    library,
                    "libvlc_media_discoverer_is_running",
                )?,
                media_discoverer_media_list: required(
                    library,
                    "libvlc_media_discoverer_media_list",
                )?,

                vlm_release: required(library, "libvlc_vlm_release")?,
                vlm_add_broadcast: required(library, "libvlc_vlm_add_broadcast")?,
                vlm_play_media: required(library, "libvlc_vlm_play_media")?,
                vlm_stop_media: required(library, "libvlc_vlm_stop_media")?,
                vlm_pause_media: required(library, "libvlc_vlm_pause_media")?,
                vlm_del_media: required(library, "libvlc_vlm_del_media")?,
                vlm_get_event_manager: required(library, "libvlc_vlm_get_event_manager")?,
            })
        }
    }
}
