//! Engine event notifications.
//!
//! Handlers are attached to a wrapper's native event manager and stay
//! pinned on that wrapper until it is dropped, which detaches them before
//! freeing anything.

use std::sync::Arc;

use libc::{c_int, c_void};
use serde::Serialize;

use crate::api::LibVlc;
use crate::callback::{PinnedCallbacks, guard};
use crate::enums::MediaState;
use crate::error::{Error, Result};
use crate::ffi::{libvlc_event_manager_t, libvlc_event_t};
use crate::util::cstr_to_string;

/// Native event type identifiers (`libvlc_event_e`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(i32)]
pub enum EventType {
    MediaMetaChanged = 0,
    MediaSubItemAdded = 1,
    MediaDurationChanged = 2,
    MediaParsedChanged = 3,
    MediaFreed = 4,
    MediaStateChanged = 5,

    MediaPlayerMediaChanged = 0x100,
    MediaPlayerNothingSpecial = 0x101,
    MediaPlayerOpening = 0x102,
    MediaPlayerBuffering = 0x103,
    MediaPlayerPlaying = 0x104,
    MediaPlayerPaused = 0x105,
    MediaPlayerStopped = 0x106,
    MediaPlayerForward = 0x107,
    MediaPlayerBackward = 0x108,
    MediaPlayerEndReached = 0x109,
    MediaPlayerEncounteredError = 0x10a,
    MediaPlayerTimeChanged = 0x10b,
    MediaPlayerPositionChanged = 0x10c,
    MediaPlayerSeekableChanged = 0x10d,
    MediaPlayerPausableChanged = 0x10e,
    MediaPlayerTitleChanged = 0x10f,
    MediaPlayerSnapshotTaken = 0x110,
    MediaPlayerLengthChanged = 0x111,
    MediaPlayerVout = 0x112,

    MediaListItemAdded = 0x200,
    MediaListWillAddItem = 0x201,
    MediaListItemDeleted = 0x202,
    MediaListWillDeleteItem = 0x203,

    MediaListPlayerPlayed = 0x400,
    MediaListPlayerNextItemSet = 0x401,
    MediaListPlayerStopped = 0x402,

    VlmMediaAdded = 0x600,
    VlmMediaRemoved = 0x601,
    VlmMediaChanged = 0x602,
    VlmMediaInstanceStarted = 0x603,
    VlmMediaInstanceStopped = 0x604,
    VlmMediaInstanceStatusInit = 0x605,
    VlmMediaInstanceStatusOpening = 0x606,
    VlmMediaInstanceStatusPlaying = 0x607,
    VlmMediaInstanceStatusPause = 0x608,
    VlmMediaInstanceStatusEnd = 0x609,
    VlmMediaInstanceStatusError = 0x60a,
}

impl TryFrom<i32> for EventType {
    type Error = Error;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        use EventType::*;
        let ty = match value {
            0 => MediaMetaChanged,
            1 => MediaSubItemAdded,
            2 => MediaDurationChanged,
            3 => MediaParsedChanged,
            4 => MediaFreed,
            5 => MediaStateChanged,
            0x100 => MediaPlayerMediaChanged,
            0x101 => MediaPlayerNothingSpecial,
            0x102 => MediaPlayerOpening,
            0x103 => MediaPlayerBuffering,
            0x104 => MediaPlayerPlaying,
            0x105 => MediaPlayerPaused,
            0x106 => MediaPlayerStopped,
            0x107 => MediaPlayerForward,
            0x108 => MediaPlayerBackward,
            0x109 => MediaPlayerEndReached,
            0x10a => MediaPlayerEncounteredError,
            0x10b => MediaPlayerTimeChanged,
            0x10c => MediaPlayerPositionChanged,
            0x10d => MediaPlayerSeekableChanged,
            0x10e => MediaPlayerPausableChanged,
            0x10f => MediaPlayerTitleChanged,
            0x110 => MediaPlayerSnapshotTaken,
            0x111 => MediaPlayerLengthChanged,
            0x112 => MediaPlayerVout,
            0x200 => MediaListItemAdded,
            0x201 => MediaListWillAddItem,
            0x202 => MediaListItemDeleted,
            0x203 => MediaListWillDeleteItem,
            0x400 => MediaListPlayerPlayed,
            0x401 => MediaListPlayerNextItemSet,
            0x402 => MediaListPlayerStopped,
            0x600 => VlmMediaAdded,
            0x601 => VlmMediaRemoved,
            0x602 => VlmMediaChanged,
            0x603 => VlmMediaInstanceStarted,
            0x604 => VlmMediaInstanceStopped,
            0x605 => VlmMediaInstanceStatusInit,
            0x606 => VlmMediaInstanceStatusOpening,
            0x607 => VlmMediaInstanceStatusPlaying,
            0x608 => VlmMediaInstanceStatusPause,
            0x609 => VlmMediaInstanceStatusEnd,
            0x60a => VlmMediaInstanceStatusError,
            other => return Err(Error::unsupported("event type", other.to_string())),
        };
        Ok(ty)
    }
}

impl EventType {
    fn is_vlm(self) -> bool {
        (self as i32) & 0xf00 == 0x600
    }
}

/// A decoded engine event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Event {
    MediaDurationChanged { duration_ms: i64 },
    MediaStateChanged { state: MediaState },
    PlayerBuffering { cache: f32 },
    PlayerTimeChanged { time_ms: i64 },
    PlayerPositionChanged { position: f32 },
    PlayerLengthChanged { length_ms: i64 },
    MediaListItem { event: EventType, index: i32 },
    Vlm {
        event: EventType,
        media_name: Option<String>,
        instance_name: Option<String>,
    },
    /// An event whose payload carries nothing this crate decodes.
    Signal { event: EventType },
}

impl Event {
    /// Decode a native event record.
    ///
    /// # Safety
    ///
    /// `raw` must point to a valid `libvlc_event_t` whose payload matches
    /// its type field.
    pub unsafe fn from_raw(raw: *const libvlc_event_t) -> Result<Self> {
        let raw = unsafe { &*raw };
        let event = EventType::try_from(raw.type_)?;
        let decoded = unsafe {
            match event {
                EventType::MediaDurationChanged => Event::MediaDurationChanged {
                    duration_ms: raw.u.media_duration_changed.new_duration,
                },
                EventType::MediaStateChanged => Event::MediaStateChanged {
                    state: MediaState::try_from(raw.u.media_state_changed.new_state)?,
                },
                EventType::MediaPlayerBuffering => Event::PlayerBuffering {
                    cache: raw.u.media_player_buffering.new_cache,
                },
                EventType::MediaPlayerTimeChanged => Event::PlayerTimeChanged {
                    time_ms: raw.u.media_player_time_changed.new_time,
                },
                EventType::MediaPlayerPositionChanged => Event::PlayerPositionChanged {
                    position: raw.u.media_player_position_changed.new_position,
                },
                EventType::MediaPlayerLengthChanged => Event::PlayerLengthChanged {
                    length_ms: raw.u.media_player_length_changed.new_length,
                },
                EventType::MediaListItemAdded
                | EventType::MediaListWillAddItem
                | EventType::MediaListItemDeleted
                | EventType::MediaListWillDeleteItem => Event::MediaListItem {
                    event,
                    index: raw.u.media_list_item.index,
                },
                ty if ty.is_vlm() => Event::Vlm {
                    event,
                    media_name: cstr_to_string(raw.u.vlm_media_event.psz_media_name),
                    instance_name: cstr_to_string(raw.u.vlm_media_event.psz_instance_name),
                },
                _ => Event::Signal { event },
            }
        };
        Ok(decoded)
    }
}

type Handler = Box<dyn Fn(&Event) + Send + Sync>;

struct EventBridge {
    handler: Handler,
}

unsafe extern "C" fn event_trampoline(raw: *const libvlc_event_t, data: *mut c_void) {
    guard("event", (), || {
        let bridge = unsafe { &*data.cast::<EventBridge>() };
        match unsafe { Event::from_raw(raw) } {
            Ok(event) => (bridge.handler)(&event),
            Err(e) => tracing::warn!("undecodable libvlc event: {e}"),
        }
    })
}

/// Event handlers attached to one native event manager.
///
/// The engine may deliver events for one object from several threads, so
/// handlers are `Fn + Sync` and receive a shared reference.
pub(crate) struct EventHub {
    api: Arc<LibVlc>,
    manager: *mut libvlc_event_manager_t,
    attached: Vec<(EventType, *mut c_void)>,
    pins: PinnedCallbacks,
}

// The raw pointers are only dereferenced by the engine.
unsafe impl Send for EventHub {}

impl EventHub {
    pub(crate) fn new(api: Arc<LibVlc>) -> Self {
        Self {
            api,
            manager: std::ptr::null_mut(),
            attached: Vec::new(),
            pins: PinnedCallbacks::new(),
        }
    }

    /// Attach `handler` for `event` on `manager`.
    ///
    /// # Safety
    ///
    /// `manager` must be the event manager of the wrapper owning this hub
    /// and stay valid until [`EventHub::detach_all`] runs.
    pub(crate) unsafe fn attach(
        &mut self,
        manager: *mut libvlc_event_manager_t,
        event: EventType,
        handler: Handler,
    ) -> Result<()> {
        if manager.is_null() {
            return Err(Error::CreationFailed {
                operation: "libvlc event manager lookup",
            });
        }
        self.manager = manager;
        let data = self.pins.pin("event", EventBridge { handler });
        let status = unsafe {
            (self.api.symbols().event_attach)(
                manager,
                event as c_int,
                event_trampoline,
                data.cast(),
            )
        };
        if status != 0 {
            return Err(Error::CreationFailed {
                operation: "libvlc_event_attach",
            });
        }
        self.attached.push((event, data.cast()));
        tracing::debug!(?event, "event handler attached");
        Ok(())
    }

    /// Detach every handler, then free them.
    pub(crate) fn detach_all(&mut self) {
        for (event, data) in self.attached.drain(..) {
            unsafe {
                (self.api.symbols().event_detach)(
                    self.manager,
                    event as c_int,
                    event_trampoline,
                    data,
                )
            };
        }
        self.pins.clear();
    }
}

impl Drop for EventHub {
    fn drop(&mut self) {
        self.detach_all();
    }
}

/// Wrappers whose native object exposes an event manager.
pub trait EventSource {
    /// Call `handler` every time the engine raises `event` for this object.
    ///
    /// The handler runs on an engine thread and must not block.
    fn on<F>(&mut self, event: EventType, handler: F) -> Result<()>
    where
        F: Fn(&Event) + Send + Sync + 'static;
}
