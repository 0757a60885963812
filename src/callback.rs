//! Bridge from native callback invocations into Rust code.
//!
//! The engine stores only a raw function pointer plus an opaque `void*`.
//! The function pointers here are static trampolines; the opaque pointer
//! is a heap allocation owned by a [`PinnedCallbacks`] collection on the
//! wrapper that registered it. The owner tells the engine to stop calling
//! (by registering null callbacks or detaching) before that collection is
//! dropped.
//!
//! Trampolines run on the engine's audio, video or event threads. They
//! never block and never propagate a panic across the C boundary.

use std::ptr::{self, NonNull};
use std::slice;

use libc::{c_char, c_float, c_int, c_uint, c_void};

use crate::api::Symbols;
use crate::enums::{ChromaType, SoundType, fourcc_str};
use crate::error::Result;
use crate::ffi::libvlc_media_player_t;
use crate::util::to_cstring;

/// Maximum number of picture planes the engine passes to video callbacks.
pub const MAX_PLANES: usize = 5;

struct PinnedAdapter {
    label: &'static str,
    state: NonNull<()>,
    drop_state: unsafe fn(NonNull<()>),
}

impl Drop for PinnedAdapter {
    fn drop(&mut self) {
        tracing::trace!(label = self.label, "unpinning callback adapter");
        unsafe { (self.drop_state)(self.state) };
    }
}

unsafe fn drop_boxed<S>(state: NonNull<()>) {
    drop(unsafe { Box::from_raw(state.as_ptr().cast::<S>()) });
}

/// Adapter state handed to the engine, kept at a stable address until the
/// collection is dropped.
///
/// Entries are only added by the owning wrapper through `&mut self` and are
/// never removed individually.
#[derive(Default)]
pub struct PinnedCallbacks {
    entries: Vec<PinnedAdapter>,
}

// Every pinned state is `Send`; the collection itself is only mutated
// through its owner.
unsafe impl Send for PinnedCallbacks {}

impl PinnedCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `state` to the heap and return the address to give the engine.
    pub fn pin<S: Send + 'static>(&mut self, label: &'static str, state: S) -> *mut S {
        let raw = Box::into_raw(Box::new(state));
        // SAFETY: Box::into_raw never returns null.
        let state = unsafe { NonNull::new_unchecked(raw.cast::<()>()) };
        self.entries.push(PinnedAdapter {
            label,
            state,
            drop_state: drop_boxed::<S>,
        });
        raw
    }

    /// Whether `state` is the address of a live pinned adapter.
    pub fn contains<S>(&self, state: *const S) -> bool {
        self.entries
            .iter()
            .any(|entry| ptr::eq(entry.state.as_ptr().cast_const(), state.cast::<()>()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.label).collect()
    }

    /// Drop every adapter. The engine must no longer be calling any of them.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for PinnedCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "non-string panic payload".to_string()
}

/// Run a callback body, turning a panic into `default` plus an error log.
pub(crate) fn guard<T>(op: &'static str, default: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => {
            let msg = panic_message(payload);
            tracing::error!(callback = op, "panic in native callback: {msg}");
            default
        }
    }
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

/// Picture format negotiated for video callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFormat {
    pub chroma: ChromaType,
    pub width: u32,
    pub height: u32,
    /// `(pitch, lines)` per plane.
    pub planes: Vec<(u32, u32)>,
}

impl VideoFormat {
    /// A format with the default plane layout for `chroma`.
    pub fn new(chroma: ChromaType, width: u32, height: u32) -> Self {
        Self {
            chroma,
            width,
            height,
            planes: chroma.plane_layout(width, height),
        }
    }
}

/// Receiver of decoded video pictures.
///
/// All methods are called from the engine's video output thread, one at a
/// time.
pub trait VideoSink: Send + 'static {
    /// Point `planes` at the buffers for the next picture and return an
    /// identifier for it (passed back to `unlock` and `display`).
    fn lock(&mut self, planes: &mut [*mut c_void]) -> *mut c_void;

    fn unlock(&mut self, _picture: *mut c_void, _planes: &[*mut c_void]) {}

    fn display(&mut self, _picture: *mut c_void) {}

    /// Accept or adjust the format proposed by the decoder. Returns the
    /// number of picture buffers to allocate; zero refuses the format.
    fn format(&mut self, _format: &mut VideoFormat) -> u32 {
        1
    }

    /// The negotiated format is no longer in use.
    fn cleanup(&mut self) {}
}

struct VideoBridge {
    sink: Box<dyn VideoSink>,
}

unsafe extern "C" fn video_lock(opaque: *mut c_void, planes: *mut *mut c_void) -> *mut c_void {
    guard("video_lock", ptr::null_mut(), || {
        let bridge = unsafe { &mut *opaque.cast::<VideoBridge>() };
        let planes = unsafe { slice::from_raw_parts_mut(planes, MAX_PLANES) };
        bridge.sink.lock(planes)
    })
}

unsafe extern "C" fn video_unlock(
    opaque: *mut c_void,
    picture: *mut c_void,
    planes: *const *mut c_void,
) {
    guard("video_unlock", (), || {
        let bridge = unsafe { &mut *opaque.cast::<VideoBridge>() };
        let planes: &[*mut c_void] = if planes.is_null() {
            &[]
        } else {
            unsafe { slice::from_raw_parts(planes, MAX_PLANES) }
        };
        bridge.sink.unlock(picture, planes);
    })
}

unsafe extern "C" fn video_display(opaque: *mut c_void, picture: *mut c_void) {
    guard("video_display", (), || {
        let bridge = unsafe { &mut *opaque.cast::<VideoBridge>() };
        bridge.sink.display(picture);
    })
}

unsafe extern "C" fn video_format(
    opaque: *mut *mut c_void,
    chroma: *mut c_char,
    width: *mut c_uint,
    height: *mut c_uint,
    pitches: *mut c_uint,
    lines: *mut c_uint,
) -> c_uint {
    guard("video_format", 0, || {
        let bridge = unsafe { &mut *(*opaque).cast::<VideoBridge>() };
        let code = unsafe { &mut *chroma.cast::<[u8; 4]>() };
        let proposed = fourcc_str(code);
        let chroma_type = match proposed.parse::<ChromaType>() {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("video format refused: {e}");
                return 0;
            }
        };

        let mut format = unsafe { VideoFormat::new(chroma_type, *width, *height) };
        let buffers = bridge.sink.format(&mut format);
        if buffers == 0 {
            return 0;
        }

        *code = format.chroma.fourcc();
        unsafe {
            *width = format.width;
            *height = format.height;
            let pitches = slice::from_raw_parts_mut(pitches, MAX_PLANES);
            let lines = slice::from_raw_parts_mut(lines, MAX_PLANES);
            for (i, (pitch, rows)) in format.planes.iter().take(MAX_PLANES).enumerate() {
                pitches[i] = *pitch;
                lines[i] = *rows;
            }
        }
        buffers
    })
}

unsafe extern "C" fn video_cleanup(opaque: *mut c_void) {
    guard("video_cleanup", (), || {
        let bridge = unsafe { &mut *opaque.cast::<VideoBridge>() };
        bridge.sink.cleanup();
    })
}

/// Register `sink` for the video output of `player`.
///
/// With `Some(format)` the engine converts to that fixed format; with
/// `None` the sink negotiates through [`VideoSink::format`].
///
/// # Safety
///
/// `player` must be a live media player handle owned by the caller, whose
/// drop path calls [`clear_video`] before dropping `pins`.
pub(crate) unsafe fn install_video(
    api: &Symbols,
    player: *mut libvlc_media_player_t,
    pins: &mut PinnedCallbacks,
    sink: Box<dyn VideoSink>,
    format: Option<&VideoFormat>,
) -> Result<()> {
    let chroma = match format {
        Some(f) => Some(to_cstring(f.chroma.as_str(), "chroma")?),
        None => None,
    };
    let opaque = pins.pin("video", VideoBridge { sink });
    unsafe {
        (api.video_set_callbacks)(
            player,
            Some(video_lock),
            Some(video_unlock),
            Some(video_display),
            opaque.cast(),
        );
        match (format, chroma) {
            (Some(f), Some(chroma)) => {
                let pitch = f.planes.first().map(|p| p.0).unwrap_or(0);
                (api.video_set_format)(player, chroma.as_ptr(), f.width, f.height, pitch);
            }
            _ => (api.video_set_format_callbacks)(player, Some(video_format), Some(video_cleanup)),
        }
    }
    tracing::debug!(fixed_format = format.is_some(), "video callbacks installed");
    Ok(())
}

/// Stop the engine from invoking video callbacks on `player`.
///
/// # Safety
///
/// `player` must be a live media player handle.
pub(crate) unsafe fn clear_video(api: &Symbols, player: *mut libvlc_media_player_t) {
    unsafe {
        (api.video_set_callbacks)(player, None, None, None, ptr::null_mut());
        (api.video_set_format_callbacks)(player, None, None);
    }
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// PCM format delivered to audio callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample: SoundType,
    pub rate: u32,
    pub channels: u32,
}

impl AudioFormat {
    pub fn new(sample: SoundType, rate: u32, channels: u32) -> Self {
        Self {
            sample,
            rate,
            channels,
        }
    }

    /// Bytes occupied by `frames` interleaved frames.
    pub fn frame_bytes(&self, frames: u32) -> usize {
        frames as usize * self.channels as usize * self.sample.bytes_per_sample()
    }
}

/// Receiver of decoded audio.
///
/// All methods are called from the engine's audio output thread, one at a
/// time.
pub trait AudioSink: Send + 'static {
    /// Interleaved PCM for `frames` frames, to be presented at `pts`.
    fn play(&mut self, samples: &[u8], frames: u32, pts: i64);

    fn pause(&mut self, _pts: i64) {}

    fn resume(&mut self, _pts: i64) {}

    fn flush(&mut self, _pts: i64) {}

    fn drain(&mut self) {}

    fn volume(&mut self, _volume: f32, _mute: bool) {}

    /// Accept or adjust the proposed stream format. Returning `false`
    /// refuses the stream.
    fn setup(&mut self, _format: &mut AudioFormat) -> bool {
        true
    }

    fn cleanup(&mut self) {}
}

struct AudioBridge {
    sink: Box<dyn AudioSink>,
    format: Option<AudioFormat>,
}

unsafe extern "C" fn audio_play(
    data: *mut c_void,
    samples: *const c_void,
    count: c_uint,
    pts: i64,
) {
    guard("audio_play", (), || {
        let bridge = unsafe { &mut *data.cast::<AudioBridge>() };
        let Some(format) = bridge.format else {
            tracing::warn!("audio samples before format setup dropped");
            return;
        };
        let samples: &[u8] = if samples.is_null() || count == 0 {
            &[]
        } else {
            unsafe { slice::from_raw_parts(samples.cast::<u8>(), format.frame_bytes(count)) }
        };
        bridge.sink.play(samples, count, pts);
    })
}

unsafe extern "C" fn audio_pause(data: *mut c_void, pts: i64) {
    guard("audio_pause", (), || {
        let bridge = unsafe { &mut *data.cast::<AudioBridge>() };
        bridge.sink.pause(pts);
    })
}

unsafe extern "C" fn audio_resume(data: *mut c_void, pts: i64) {
    guard("audio_resume", (), || {
        let bridge = unsafe { &mut *data.cast::<AudioBridge>() };
        bridge.sink.resume(pts);
    })
}

unsafe extern "C" fn audio_flush(data: *mut c_void, pts: i64) {
    guard("audio_flush", (), || {
        let bridge = unsafe { &mut *data.cast::<AudioBridge>() };
        bridge.sink.flush(pts);
    })
}

unsafe extern "C" fn audio_drain(data: *mut c_void) {
    guard("audio_drain", (), || {
        let bridge = unsafe { &mut *data.cast::<AudioBridge>() };
        bridge.sink.drain();
    })
}

unsafe extern "C" fn audio_volume(data: *mut c_void, volume: c_float, mute: bool) {
    guard("audio_volume", (), || {
        let bridge = unsafe { &mut *data.cast::<AudioBridge>() };
        bridge.sink.volume(volume, mute);
    })
}

unsafe extern "C" fn audio_setup(
    data: *mut *mut c_void,
    format: *mut c_char,
    rate: *mut c_uint,
    channels: *mut c_uint,
) -> c_int {
    guard("audio_setup", -1, || {
        let bridge = unsafe { &mut *(*data).cast::<AudioBridge>() };
        let code = unsafe { &mut *format.cast::<[u8; 4]>() };
        let sample = match fourcc_str(code).parse::<SoundType>() {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("audio format refused: {e}");
                return -1;
            }
        };

        let mut negotiated = unsafe { AudioFormat::new(sample, *rate, *channels) };
        if !bridge.sink.setup(&mut negotiated) {
            return -1;
        }
        *code = negotiated.sample.fourcc();
        unsafe {
            *rate = negotiated.rate;
            *channels = negotiated.channels;
        }
        bridge.format = Some(negotiated);
        0
    })
}

unsafe extern "C" fn audio_cleanup(data: *mut c_void) {
    guard("audio_cleanup", (), || {
        let bridge = unsafe { &mut *data.cast::<AudioBridge>() };
        bridge.format = None;
        bridge.sink.cleanup();
    })
}

/// Register `sink` for the audio output of `player`, volume changes
/// included.
///
/// With `Some(format)` the engine converts to that fixed format; with
/// `None` the sink negotiates through [`AudioSink::setup`].
///
/// # Safety
///
/// `player` must be a live media player handle owned by the caller, whose
/// drop path calls [`clear_audio`] before dropping `pins`.
pub(crate) unsafe fn install_audio(
    api: &Symbols,
    player: *mut libvlc_media_player_t,
    pins: &mut PinnedCallbacks,
    sink: Box<dyn AudioSink>,
    format: Option<AudioFormat>,
) -> Result<()> {
    let sample = match format {
        Some(f) => Some(to_cstring(f.sample.as_str(), "format")?),
        None => None,
    };
    let opaque = pins.pin("audio", AudioBridge { sink, format });
    unsafe {
        (api.audio_set_callbacks)(
            player,
            Some(audio_play),
            Some(audio_pause),
            Some(audio_resume),
            Some(audio_flush),
            Some(audio_drain),
            opaque.cast(),
        );
        (api.audio_set_volume_callback)(player, Some(audio_volume));
        match (format, sample) {
            (Some(f), Some(sample)) => {
                (api.audio_set_format)(player, sample.as_ptr(), f.rate, f.channels)
            }
            _ => (api.audio_set_format_callbacks)(player, Some(audio_setup), Some(audio_cleanup)),
        }
    }
    tracing::debug!(fixed_format = format.is_some(), "audio callbacks installed");
    Ok(())
}

/// Stop the engine from invoking audio callbacks on `player`.
///
/// # Safety
///
/// `player` must be a live media player handle.
pub(crate) unsafe fn clear_audio(api: &Symbols, player: *mut libvlc_media_player_t) {
    unsafe {
        (api.audio_set_callbacks)(player, None, None, None, None, None, ptr::null_mut());
        (api.audio_set_volume_callback)(player, None);
        (api.audio_set_format_callbacks)(player, None, None);
    }
}

// ---------------------------------------------------------------------------
// Library exit
// ---------------------------------------------------------------------------

pub(crate) struct ExitBridge {
    pub(crate) handler: Box<dyn FnMut() + Send>,
}

pub(crate) unsafe extern "C" fn exit_trampoline(opaque: *mut c_void) {
    guard("exit_handler", (), || {
        let bridge = unsafe { &mut *opaque.cast::<ExitBridge>() };
        (bridge.handler)();
    })
}
