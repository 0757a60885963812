//! Media items and media lists.

use std::ops::{Deref, DerefMut};

use libc::c_void;

use crate::enums::MediaState;
use crate::error::{Error, Result};
use crate::event::{Event, EventHub, EventSource, EventType};
use crate::factory::{Capability, FactoryArg, FactoryBuilt, expect_input, expect_none};
use crate::ffi::{libvlc_media_list_t, libvlc_media_t};
use crate::handle::{LibraryHandle, NativePointer, NativeRef, ReferenceCount};
use crate::util::{take_native_string, to_cstring};

/// A media item: anything the engine can open from an MRL.
pub struct Media {
    // Declared first so handlers are detached before the handle goes.
    events: EventHub,
    handle: NativeRef<libvlc_media_t>,
    library: LibraryHandle,
    input: String,
}

impl Media {
    fn open(library: &LibraryHandle, input: &str, as_path: bool) -> Result<Self> {
        let c_input = to_cstring(input, "input")?;
        let instance = library.get()?;
        let api = library.api();
        let s = api.symbols();
        let (raw, operation) = unsafe {
            if as_path {
                ((s.media_new_path)(instance, c_input.as_ptr()), "libvlc_media_new_path")
            } else {
                (
                    (s.media_new_location)(instance, c_input.as_ptr()),
                    "libvlc_media_new_location",
                )
            }
        };
        let retain = Some(s.media_retain);
        let handle = NativeRef::from_raw(api.clone(), raw, "media", retain, s.media_release)
            .ok_or(Error::CreationFailed { operation })?;
        Ok(Self {
            events: EventHub::new(api.clone()),
            handle,
            library: library.clone(),
            input: input.to_string(),
        })
    }

    /// The input this media was created from.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn library(&self) -> &LibraryHandle {
        &self.library
    }

    /// Add an input option such as `:no-audio` or `:start-time=10`.
    pub fn add_option(&self, option: &str) -> Result<()> {
        let ptr = self.handle.get()?;
        let option = to_cstring(option, "option")?;
        unsafe { (self.library.api().symbols().media_add_option)(ptr, option.as_ptr()) };
        Ok(())
    }

    /// Add every option in order. Options are validated before any reaches
    /// the engine.
    pub fn add_options<S: AsRef<str>>(&self, options: &[S]) -> Result<()> {
        let ptr = self.handle.get()?;
        let options = options
            .iter()
            .map(|o| to_cstring(o.as_ref(), "option"))
            .collect::<Result<Vec<_>>>()?;
        let add = self.library.api().symbols().media_add_option;
        for option in &options {
            unsafe { add(ptr, option.as_ptr()) };
        }
        Ok(())
    }

    /// The MRL as the engine resolved it.
    pub fn mrl(&self) -> Result<Option<String>> {
        let ptr = self.handle.get()?;
        let s = self.library.api().symbols();
        Ok(unsafe { take_native_string(s, (s.media_get_mrl)(ptr)) })
    }

    pub fn state(&self) -> Result<MediaState> {
        let ptr = self.handle.get()?;
        let raw = unsafe { (self.library.api().symbols().media_get_state)(ptr) };
        MediaState::try_from(raw)
    }

    pub(crate) fn raw(&self) -> Result<*mut libvlc_media_t> {
        self.handle.get()
    }
}

impl FactoryBuilt for Media {
    const CAPABILITY: Capability = Capability::Media;

    fn construct(library: &LibraryHandle, args: &[FactoryArg<'_>]) -> Result<Self> {
        Media::open(library, expect_input(args)?, false)
    }
}

impl NativePointer for Media {
    fn pointer(&self) -> *mut c_void {
        self.handle.as_ptr().cast()
    }
}

impl ReferenceCount for Media {
    fn add_ref(&self) -> Result<()> {
        self.handle.add_ref()
    }

    fn release(&mut self) {
        self.events.detach_all();
        self.handle.release();
    }
}

impl EventSource for Media {
    fn on<F>(&mut self, event: EventType, handler: F) -> Result<()>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let ptr = self.handle.get()?;
        let manager = unsafe { (self.library.api().symbols().media_event_manager)(ptr) };
        unsafe { self.events.attach(manager, event, Box::new(handler)) }
    }
}

impl std::fmt::Debug for Media {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Media")
            .field("input", &self.input)
            .field("handle", &self.handle)
            .finish()
    }
}

/// Media types the object factory can build from an input string.
pub trait MediaKind: std::any::Any + Sized {
    fn media(&self) -> &Media;

    fn into_media(self) -> Media;
}

impl MediaKind for Media {
    fn media(&self) -> &Media {
        self
    }

    fn into_media(self) -> Media {
        self
    }
}

macro_rules! media_newtype {
    ($(#[$meta:meta])* $name:ident, as_path = $as_path:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name(Media);

        impl FactoryBuilt for $name {
            const CAPABILITY: Capability = Capability::Media;

            fn construct(library: &LibraryHandle, args: &[FactoryArg<'_>]) -> Result<Self> {
                Media::open(library, expect_input(args)?, $as_path).map($name)
            }
        }

        impl MediaKind for $name {
            fn media(&self) -> &Media {
                &self.0
            }

            fn into_media(self) -> Media {
                self.0
            }
        }

        impl Deref for $name {
            type Target = Media;

            fn deref(&self) -> &Media {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Media {
                &mut self.0
            }
        }
    };
}

media_newtype!(
    /// A local file, opened by path rather than MRL.
    MediaFromFile,
    as_path = true
);

media_newtype!(
    /// A capture device such as `dshow://` or `v4l2:///dev/video0`.
    VideoInputMedia,
    as_path = false
);

media_newtype!(
    /// Desktop capture through the `screen://` access module.
    ScreenCaptureMedia,
    as_path = false
);

impl ScreenCaptureMedia {
    pub fn set_frame_rate(&self, fps: f32) -> Result<()> {
        self.0.add_option(&format!(":screen-fps={fps}"))
    }

    /// Restrict capture to a rectangle of the desktop.
    pub fn set_capture_area(&self, left: i32, top: i32, width: u32, height: u32) -> Result<()> {
        self.0.add_options(&[
            format!(":screen-left={left}"),
            format!(":screen-top={top}"),
            format!(":screen-width={width}"),
            format!(":screen-height={height}"),
        ])
    }
}

/// An ordered list of media items.
///
/// Items added through [`MediaList::add`] are kept alive by the list.
/// Lists owned by a discoverer are filled by the engine and only report
/// their native count.
pub struct MediaList {
    events: EventHub,
    handle: NativeRef<libvlc_media_list_t>,
    library: LibraryHandle,
    items: Vec<Media>,
}

impl MediaList {
    /// Wrap a list reference returned by the engine, taking ownership of it.
    pub(crate) fn from_raw(library: &LibraryHandle, raw: *mut libvlc_media_list_t) -> Result<Self> {
        let api = library.api();
        let s = api.symbols();
        let handle = NativeRef::from_raw(
            api.clone(),
            raw,
            "media list",
            Some(s.media_list_retain),
            s.media_list_release,
        )
        .ok_or(Error::CreationFailed {
            operation: "libvlc_media_list_new",
        })?;
        Ok(Self {
            events: EventHub::new(api.clone()),
            handle,
            library: library.clone(),
            items: Vec::new(),
        })
    }

    pub fn library(&self) -> &LibraryHandle {
        &self.library
    }

    /// Append `media` to the end of the list.
    pub fn add(&mut self, media: Media) -> Result<()> {
        let list = self.handle.get()?;
        let item = media.raw()?;
        let s = self.library.api().symbols();
        let status = unsafe {
            (s.media_list_lock)(list);
            let status = (s.media_list_add_media)(list, item);
            (s.media_list_unlock)(list);
            status
        };
        if status != 0 {
            return Err(Error::CreationFailed {
                operation: "libvlc_media_list_add_media",
            });
        }
        tracing::debug!(input = media.input(), index = self.items.len(), "media appended to list");
        self.items.push(media);
        Ok(())
    }

    /// Items added through this wrapper, in insertion order.
    pub fn items(&self) -> &[Media] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item count as the engine sees it, including items it added itself.
    pub fn native_count(&self) -> Result<usize> {
        let list = self.handle.get()?;
        let s = self.library.api().symbols();
        let count = unsafe {
            (s.media_list_lock)(list);
            let count = (s.media_list_count)(list);
            (s.media_list_unlock)(list);
            count
        };
        Ok(count.max(0) as usize)
    }

    pub(crate) fn raw(&self) -> Result<*mut libvlc_media_list_t> {
        self.handle.get()
    }
}

impl FactoryBuilt for MediaList {
    const CAPABILITY: Capability = Capability::MediaList;

    fn construct(library: &LibraryHandle, args: &[FactoryArg<'_>]) -> Result<Self> {
        expect_none(args)?;
        let instance = library.get()?;
        let raw = unsafe { (library.api().symbols().media_list_new)(instance) };
        MediaList::from_raw(library, raw)
    }
}

impl NativePointer for MediaList {
    fn pointer(&self) -> *mut c_void {
        self.handle.as_ptr().cast()
    }
}

impl ReferenceCount for MediaList {
    fn add_ref(&self) -> Result<()> {
        self.handle.add_ref()
    }

    fn release(&mut self) {
        self.events.detach_all();
        self.handle.release();
        self.items.clear();
    }
}

impl EventSource for MediaList {
    fn on<F>(&mut self, event: EventType, handler: F) -> Result<()>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let ptr = self.handle.get()?;
        let manager = unsafe { (self.library.api().symbols().media_list_event_manager)(ptr) };
        unsafe { self.events.attach(manager, event, Box::new(handler)) }
    }
}

impl std::fmt::Debug for MediaList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaList")
            .field("handle", &self.handle)
            .field("items", &self.items.len())
            .finish()
    }
}
