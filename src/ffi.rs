//! Raw libvlc declarations: opaque handle types, structure layouts and
//! callback signatures.
//!
//! Nothing here carries logic. Layouts mirror `libvlc.h`,
//! `libvlc_media_player.h` and `libvlc_events.h` field for field.

#![allow(non_camel_case_types)]

use libc::{c_char, c_float, c_int, c_uint, c_void};

/// Opaque libvlc instance (`libvlc_instance_t`).
#[repr(C)]
pub struct libvlc_instance_t {
    _private: [u8; 0],
}

/// Opaque media item (`libvlc_media_t`).
#[repr(C)]
pub struct libvlc_media_t {
    _private: [u8; 0],
}

/// Opaque media list (`libvlc_media_list_t`).
#[repr(C)]
pub struct libvlc_media_list_t {
    _private: [u8; 0],
}

/// Opaque media player (`libvlc_media_player_t`).
#[repr(C)]
pub struct libvlc_media_player_t {
    _private: [u8; 0],
}

/// Opaque media list player (`libvlc_media_list_player_t`).
#[repr(C)]
pub struct libvlc_media_list_player_t {
    _private: [u8; 0],
}

/// Opaque media discoverer (`libvlc_media_discoverer_t`).
#[repr(C)]
pub struct libvlc_media_discoverer_t {
    _private: [u8; 0],
}

/// Opaque event manager (`libvlc_event_manager_t`).
#[repr(C)]
pub struct libvlc_event_manager_t {
    _private: [u8; 0],
}

/// Node of the list returned by the audio/video filter queries.
#[repr(C)]
#[derive(Debug)]
pub struct libvlc_module_description_t {
    pub psz_name: *mut c_char,
    pub psz_shortname: *mut c_char,
    pub psz_longname: *mut c_char,
    pub psz_help: *mut c_char,
    pub p_next: *mut libvlc_module_description_t,
}

/// Node of the list returned by `libvlc_audio_output_list_get`.
#[repr(C)]
#[derive(Debug)]
pub struct libvlc_audio_output_t {
    pub psz_name: *mut c_char,
    pub psz_description: *mut c_char,
    pub p_next: *mut libvlc_audio_output_t,
}

/// Node of the list returned by `libvlc_audio_output_device_list_get`.
#[repr(C)]
#[derive(Debug)]
pub struct libvlc_audio_output_device_t {
    pub p_next: *mut libvlc_audio_output_device_t,
    pub psz_device: *mut c_char,
    pub psz_description: *mut c_char,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct media_state_changed {
    pub new_state: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct media_duration_changed {
    pub new_duration: i64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct media_player_buffering {
    pub new_cache: c_float,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct media_player_position_changed {
    pub new_position: c_float,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct media_player_time_changed {
    pub new_time: i64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct media_player_length_changed {
    pub new_length: i64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct media_list_item {
    pub item: *mut libvlc_media_t,
    pub index: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct vlm_media_event {
    pub psz_media_name: *const c_char,
    pub psz_instance_name: *const c_char,
}

/// Subset of the `libvlc_event_t` payload union that this crate decodes.
#[repr(C)]
#[derive(Clone, Copy)]
pub union libvlc_event_u {
    pub media_state_changed: media_state_changed,
    pub media_duration_changed: media_duration_changed,
    pub media_player_buffering: media_player_buffering,
    pub media_player_position_changed: media_player_position_changed,
    pub media_player_time_changed: media_player_time_changed,
    pub media_player_length_changed: media_player_length_changed,
    pub media_list_item: media_list_item,
    pub vlm_media_event: vlm_media_event,
}

/// Event record delivered to `libvlc_callback_t`.
#[repr(C)]
pub struct libvlc_event_t {
    pub type_: c_int,
    pub p_obj: *mut c_void,
    pub u: libvlc_event_u,
}

// Callback shapes invoked by the engine.

pub type libvlc_callback_t = unsafe extern "C" fn(event: *const libvlc_event_t, data: *mut c_void);

pub type libvlc_exit_cb = unsafe extern "C" fn(opaque: *mut c_void);

pub type libvlc_video_lock_cb =
    unsafe extern "C" fn(opaque: *mut c_void, planes: *mut *mut c_void) -> *mut c_void;

pub type libvlc_video_unlock_cb =
    unsafe extern "C" fn(opaque: *mut c_void, picture: *mut c_void, planes: *const *mut c_void);

pub type libvlc_video_display_cb = unsafe extern "C" fn(opaque: *mut c_void, picture: *mut c_void);

pub type libvlc_video_format_cb = unsafe extern "C" fn(
    opaque: *mut *mut c_void,
    chroma: *mut c_char,
    width: *mut c_uint,
    height: *mut c_uint,
    pitches: *mut c_uint,
    lines: *mut c_uint,
) -> c_uint;

pub type libvlc_video_cleanup_cb = unsafe extern "C" fn(opaque: *mut c_void);

pub type libvlc_audio_play_cb =
    unsafe extern "C" fn(data: *mut c_void, samples: *const c_void, count: c_uint, pts: i64);

pub type libvlc_audio_pause_cb = unsafe extern "C" fn(data: *mut c_void, pts: i64);

pub type libvlc_audio_resume_cb = unsafe extern "C" fn(data: *mut c_void, pts: i64);

pub type libvlc_audio_flush_cb = unsafe extern "C" fn(data: *mut c_void, pts: i64);

pub type libvlc_audio_drain_cb = unsafe extern "C" fn(data: *mut c_void);

pub type libvlc_audio_set_volume_cb =
    unsafe extern "C" fn(data: *mut c_void, volume: c_float, mute: bool);

pub type libvlc_audio_setup_cb = unsafe extern "C" fn(
    data: *mut *mut c_void,
    format: *mut c_char,
    rate: *mut c_uint,
    channels: *mut c_uint,
) -> c_int;

pub type libvlc_audio_cleanup_cb = unsafe extern "C" fn(data: *mut c_void);
