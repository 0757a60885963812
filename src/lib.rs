//! Safe, typed facade over libvlc.
//!
//! The engine is bound at runtime ([`LibVlc`]) and booted by a
//! [`LibraryContext`], which creates every other wrapper (players, media,
//! media lists, discoverers and the VLM console) through the
//! [`ObjectFactory`].
//!
//! # Ownership
//!
//! - Every wrapper owns exactly one engine reference on its native handle
//!   and gives it back once, on [`ReferenceCount::release`] or on drop
//! - A released wrapper refuses further use with [`ErrorKind::StaleHandle`]
//! - Callback adapters (audio and video sinks, event handlers, the exit
//!   handler) stay pinned on the wrapper that registered them until the
//!   engine has been told to stop calling them
//!
//! # Thread Safety
//!
//! Sinks and event handlers run on engine threads. Sinks are `Send`;
//! event handlers are `Fn + Send + Sync` because the engine may raise
//! events for one object from several threads.
//!
//! # Example
//!
//! ```no_run
//! use vlc_facade::{BasicPlayer, EngineConfig, LibraryContext, Media, PlayerKind};
//!
//! let ctx = LibraryContext::new(EngineConfig::default())?;
//! let media: Media = ctx.create_media("file:///tmp/a.mp4", &[":no-video"])?;
//! let player: BasicPlayer = ctx.create_player()?;
//! player.set_media(&media)?;
//! player.play()?;
//! # Ok::<(), vlc_facade::Error>(())
//! ```

#![allow(clippy::missing_safety_doc)]

mod api;
mod callback;
mod config;
mod context;
mod discoverer;
mod enums;
mod error;
mod event;
mod factory;
pub mod ffi;
mod handle;
mod list;
mod media;
mod player;
mod util;
mod vlm;

#[cfg(test)]
mod mock;

pub use api::{DEFAULT_LIBRARY_NAME, LibVlc, Symbols};
pub use callback::{AudioFormat, AudioSink, MAX_PLANES, PinnedCallbacks, VideoFormat, VideoSink};
pub use config::{DEFAULT_ARGS, EngineConfig};
pub use context::{ContextState, LibraryContext};
pub use discoverer::MediaDiscoverer;
pub use enums::{ChromaType, MediaState, SoundType};
pub use error::{Error, ErrorKind, Result};
pub use event::{Event, EventSource, EventType};
pub use factory::{Capability, FactoryArg, ObjectFactory};
pub use handle::{LibraryHandle, NativePointer, NativeRef, RefFn, ReferenceCount};
pub use list::{AudioOutputDeviceInfo, AudioOutputModuleInfo, FilterInfo};
pub use media::{Media, MediaFromFile, MediaKind, MediaList, ScreenCaptureMedia, VideoInputMedia};
pub use player::{
    AudioPlayer, AudioRendering, BasicPlayer, DiskPlayer, MediaListPlayer, PlayerCore, PlayerKind,
    VideoPlayer, VideoRendering,
};
pub use vlm::{Broadcast, ManagementConsole};

/// Version of this crate, not of libvlc (see [`LibraryContext::version`]).
pub fn facade_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
