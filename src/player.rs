//! Media players and the media list player.
//!
//! A player owns the pinned adapters for every rendering callback it
//! registered. Teardown stops playback, unsets the callbacks, detaches
//! event handlers, releases the native player and only then frees the
//! adapters.

use libc::c_void;

use crate::callback::{
    AudioFormat, AudioSink, PinnedCallbacks, VideoFormat, VideoSink, clear_audio, clear_video,
    install_audio, install_video,
};
use crate::error::{Error, Result};
use crate::event::{Event, EventHub, EventSource, EventType};
use crate::factory::{Capability, FactoryArg, FactoryBuilt, expect_media_list, expect_none};
use crate::ffi::{libvlc_media_list_player_t, libvlc_media_player_t};
use crate::handle::{LibraryHandle, NativePointer, NativeRef, ReferenceCount};
use crate::media::{MediaKind, MediaList};

/// State shared by every player flavour.
pub struct PlayerCore {
    handle: NativeRef<libvlc_media_player_t>,
    library: LibraryHandle,
    events: EventHub,
    pins: PinnedCallbacks,
    video: bool,
    audio: bool,
}

impl PlayerCore {
    fn new(library: &LibraryHandle) -> Result<Self> {
        let instance = library.get()?;
        let api = library.api();
        let s = api.symbols();
        let raw = unsafe { (s.media_player_new)(instance) };
        let handle = NativeRef::from_raw(
            api.clone(),
            raw,
            "media player",
            Some(s.media_player_retain),
            s.media_player_release,
        )
        .ok_or(Error::CreationFailed {
            operation: "libvlc_media_player_new",
        })?;
        Ok(Self {
            handle,
            library: library.clone(),
            events: EventHub::new(api.clone()),
            pins: PinnedCallbacks::new(),
            video: false,
            audio: false,
        })
    }

    pub fn library(&self) -> &LibraryHandle {
        &self.library
    }

    pub(crate) fn raw(&self) -> Result<*mut libvlc_media_player_t> {
        self.handle.get()
    }

    fn set_video_sink(
        &mut self,
        sink: Box<dyn VideoSink>,
        format: Option<&VideoFormat>,
    ) -> Result<()> {
        let player = self.handle.get()?;
        let s = self.library.api().symbols();
        unsafe { install_video(s, player, &mut self.pins, sink, format)? };
        self.video = true;
        Ok(())
    }

    fn set_audio_sink(
        &mut self,
        sink: Box<dyn AudioSink>,
        format: Option<AudioFormat>,
    ) -> Result<()> {
        let player = self.handle.get()?;
        let s = self.library.api().symbols();
        unsafe { install_audio(s, player, &mut self.pins, sink, format)? };
        self.audio = true;
        Ok(())
    }

    fn teardown(&mut self) {
        if self.handle.is_released() {
            return;
        }
        let player = self.handle.as_ptr();
        let s = self.library.api().symbols();
        unsafe {
            (s.media_player_stop)(player);
            if self.video {
                clear_video(s, player);
            }
            if self.audio {
                clear_audio(s, player);
            }
        }
        self.events.detach_all();
        self.handle.release();
        if !self.pins.is_empty() {
            tracing::debug!(adapters = ?self.pins, "freeing player callback adapters");
        }
        self.pins.clear();
        self.video = false;
        self.audio = false;
    }
}

impl Drop for PlayerCore {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for PlayerCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerCore")
            .field("handle", &self.handle)
            .field("pins", &self.pins)
            .finish()
    }
}

/// Playback control common to every player.
pub trait PlayerKind: std::any::Any + Sized {
    fn core(&self) -> &PlayerCore;

    fn core_mut(&mut self) -> &mut PlayerCore;

    fn library(&self) -> &LibraryHandle {
        self.core().library()
    }

    /// Select the media played next. The engine keeps its own reference.
    fn set_media<M: MediaKind>(&self, media: &M) -> Result<()> {
        let player = self.core().raw()?;
        let item = media.media().raw()?;
        unsafe { (self.library().api().symbols().media_player_set_media)(player, item) };
        Ok(())
    }

    fn play(&self) -> Result<()> {
        let player = self.core().raw()?;
        let status = unsafe { (self.library().api().symbols().media_player_play)(player) };
        if status != 0 {
            return Err(Error::CreationFailed {
                operation: "libvlc_media_player_play",
            });
        }
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        let player = self.core().raw()?;
        unsafe { (self.library().api().symbols().media_player_pause)(player) };
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        let player = self.core().raw()?;
        unsafe { (self.library().api().symbols().media_player_stop)(player) };
        Ok(())
    }

    fn is_playing(&self) -> Result<bool> {
        let player = self.core().raw()?;
        Ok(unsafe { (self.library().api().symbols().media_player_is_playing)(player) } != 0)
    }
}

/// Players that deliver decoded audio to an [`AudioSink`].
pub trait AudioRendering: PlayerKind {
    /// Route decoded audio to `sink`.
    ///
    /// With a fixed `format` the engine converts to it; otherwise the sink
    /// negotiates the format through [`AudioSink::setup`]. The sink stays
    /// pinned until the player is released.
    fn set_audio_sink<S: AudioSink>(&mut self, sink: S, format: Option<AudioFormat>) -> Result<()> {
        self.core_mut().set_audio_sink(Box::new(sink), format)
    }
}

/// Players that deliver decoded pictures to a [`VideoSink`].
pub trait VideoRendering: PlayerKind {
    fn set_video_sink<S: VideoSink>(
        &mut self,
        sink: S,
        format: Option<&VideoFormat>,
    ) -> Result<()> {
        self.core_mut().set_video_sink(Box::new(sink), format)
    }
}

macro_rules! player_kind {
    ($(#[$meta:meta])* $name:ident $(, $render:ident)*) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            core: PlayerCore,
        }

        impl FactoryBuilt for $name {
            const CAPABILITY: Capability = Capability::Player;

            fn construct(library: &LibraryHandle, args: &[FactoryArg<'_>]) -> Result<Self> {
                expect_none(args)?;
                Ok(Self {
                    core: PlayerCore::new(library)?,
                })
            }
        }

        impl PlayerKind for $name {
            fn core(&self) -> &PlayerCore {
                &self.core
            }

            fn core_mut(&mut self) -> &mut PlayerCore {
                &mut self.core
            }
        }

        impl NativePointer for $name {
            fn pointer(&self) -> *mut c_void {
                self.core.handle.as_ptr().cast()
            }
        }

        impl ReferenceCount for $name {
            fn add_ref(&self) -> Result<()> {
                self.core.handle.add_ref()
            }

            fn release(&mut self) {
                self.core.teardown();
            }
        }

        impl EventSource for $name {
            fn on<F>(&mut self, event: EventType, handler: F) -> Result<()>
            where
                F: Fn(&Event) + Send + Sync + 'static,
            {
                let player = self.core.raw()?;
                let s = self.core.library.api().symbols();
                let manager = unsafe { (s.media_player_event_manager)(player) };
                unsafe { self.core.events.attach(manager, event, Box::new(handler)) }
            }
        }

        $(impl $render for $name {})*
    };
}

player_kind!(
    /// Plays through the engine's own audio and video outputs.
    BasicPlayer
);

player_kind!(
    /// Hands decoded audio to an [`AudioSink`].
    AudioPlayer,
    AudioRendering
);

player_kind!(
    /// Hands decoded pictures to a [`VideoSink`].
    VideoPlayer,
    VideoRendering
);

player_kind!(
    /// Renders both audio and video through sinks, typically for
    /// transcoding to disk.
    DiskPlayer,
    AudioRendering,
    VideoRendering
);

/// Plays the items of a [`MediaList`] in sequence.
pub struct MediaListPlayer {
    events: EventHub,
    handle: NativeRef<libvlc_media_list_player_t>,
    library: LibraryHandle,
}

impl MediaListPlayer {
    pub fn library(&self) -> &LibraryHandle {
        &self.library
    }

    pub fn set_media_list(&self, list: &MediaList) -> Result<()> {
        let this = self.handle.get()?;
        let list = list.raw()?;
        unsafe { (self.library.api().symbols().media_list_player_set_media_list)(this, list) };
        Ok(())
    }

    /// Render through `player` instead of the list player's internal one.
    pub fn set_player<P: PlayerKind>(&self, player: &P) -> Result<()> {
        let this = self.handle.get()?;
        let player = player.core().raw()?;
        unsafe { (self.library.api().symbols().media_list_player_set_media_player)(this, player) };
        Ok(())
    }

    pub fn play(&self) -> Result<()> {
        let this = self.handle.get()?;
        unsafe { (self.library.api().symbols().media_list_player_play)(this) };
        Ok(())
    }

    pub fn pause(&self) -> Result<()> {
        let this = self.handle.get()?;
        unsafe { (self.library.api().symbols().media_list_player_pause)(this) };
        Ok(())
    }

    pub fn stop(&self) -> Result<()> {
        let this = self.handle.get()?;
        unsafe { (self.library.api().symbols().media_list_player_stop)(this) };
        Ok(())
    }

    /// Skip to the next item. Returns `false` at the end of the list.
    pub fn next(&self) -> Result<bool> {
        let this = self.handle.get()?;
        Ok(unsafe { (self.library.api().symbols().media_list_player_next)(this) } == 0)
    }
}

impl FactoryBuilt for MediaListPlayer {
    const CAPABILITY: Capability = Capability::MediaListPlayer;

    fn construct(library: &LibraryHandle, args: &[FactoryArg<'_>]) -> Result<Self> {
        let list = expect_media_list(args)?;
        let instance = library.get()?;
        let api = library.api();
        let s = api.symbols();
        let raw = unsafe { (s.media_list_player_new)(instance) };
        let handle = NativeRef::from_raw(
            api.clone(),
            raw,
            "media list player",
            Some(s.media_list_player_retain),
            s.media_list_player_release,
        )
        .ok_or(Error::CreationFailed {
            operation: "libvlc_media_list_player_new",
        })?;
        let player = Self {
            events: EventHub::new(api.clone()),
            handle,
            library: library.clone(),
        };
        player.set_media_list(list)?;
        Ok(player)
    }
}

impl NativePointer for MediaListPlayer {
    fn pointer(&self) -> *mut c_void {
        self.handle.as_ptr().cast()
    }
}

impl ReferenceCount for MediaListPlayer {
    fn add_ref(&self) -> Result<()> {
        self.handle.add_ref()
    }

    fn release(&mut self) {
        if let Ok(this) = self.handle.get() {
            unsafe { (self.library.api().symbols().media_list_player_stop)(this) };
        }
        self.events.detach_all();
        self.handle.release();
    }
}

impl Drop for MediaListPlayer {
    fn drop(&mut self) {
        self.release();
    }
}

impl EventSource for MediaListPlayer {
    fn on<F>(&mut self, event: EventType, handler: F) -> Result<()>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let this = self.handle.get()?;
        let s = self.library.api().symbols();
        let manager = unsafe { (s.media_list_player_event_manager)(this) };
        unsafe { self.events.attach(manager, event, Box::new(handler)) }
    }
}

impl std::fmt::Debug for MediaListPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaListPlayer")
            .field("handle", &self.handle)
            .finish()
    }
}
