//! Capability registry: maps a requested wrapper type to the constructor
//! that builds it over a native library handle.
//!
//! The registry is populated once, on first use, and never mutated
//! afterwards, so lookups need no locking.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::discoverer::MediaDiscoverer;
use crate::error::{Error, Result};
use crate::handle::LibraryHandle;
use crate::media::{Media, MediaFromFile, MediaList, ScreenCaptureMedia, VideoInputMedia};
use crate::player::{AudioPlayer, BasicPlayer, DiskPlayer, MediaListPlayer, VideoPlayer};
use crate::vlm::ManagementConsole;

/// Abstract role a registered type fulfils.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Media,
    Player,
    MediaList,
    MediaListPlayer,
    MediaDiscoverer,
    ManagementConsole,
}

/// Capability-specific construction argument, passed after the library
/// handle.
#[derive(Debug, Clone, Copy)]
pub enum FactoryArg<'a> {
    /// Media input: an MRL, a file path or a capture device.
    Input(&'a str),
    /// Name of a discovery service.
    Name(&'a str),
    /// List a media list player iterates.
    MediaList(&'a MediaList),
}

/// A wrapper type the factory knows how to build.
pub(crate) trait FactoryBuilt: Any + Sized {
    const CAPABILITY: Capability;

    /// Build a fully initialised wrapper or fail without side effects
    /// visible to the caller.
    fn construct(library: &LibraryHandle, args: &[FactoryArg<'_>]) -> Result<Self>;
}

type Constructor = fn(&LibraryHandle, &[FactoryArg<'_>]) -> Result<Box<dyn Any>>;

struct Registration {
    type_name: &'static str,
    capability: Capability,
    construct: Constructor,
}

fn erased<T: FactoryBuilt>(
    library: &LibraryHandle,
    args: &[FactoryArg<'_>],
) -> Result<Box<dyn Any>> {
    T::construct(library, args).map(|value| Box::new(value) as Box<dyn Any>)
}

fn register<T: FactoryBuilt>(map: &mut HashMap<TypeId, Registration>) {
    map.insert(
        TypeId::of::<T>(),
        Registration {
            type_name: type_name::<T>(),
            capability: T::CAPABILITY,
            construct: erased::<T>,
        },
    );
}

static REGISTRY: LazyLock<HashMap<TypeId, Registration>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    register::<Media>(&mut map);
    register::<MediaFromFile>(&mut map);
    register::<VideoInputMedia>(&mut map);
    register::<ScreenCaptureMedia>(&mut map);
    register::<BasicPlayer>(&mut map);
    register::<AudioPlayer>(&mut map);
    register::<VideoPlayer>(&mut map);
    register::<DiskPlayer>(&mut map);
    register::<MediaList>(&mut map);
    register::<MediaListPlayer>(&mut map);
    register::<ManagementConsole>(&mut map);
    register::<MediaDiscoverer>(&mut map);
    tracing::debug!(entries = map.len(), "object factory registry initialised");
    map
});

/// Builds wrapper objects by requested type.
pub struct ObjectFactory;

impl ObjectFactory {
    /// Construct a `T` over `library`.
    ///
    /// Fails with `UnregisteredCapability` naming `T` when no constructor
    /// is registered for it; nothing is built in that case.
    pub fn build<T: Any>(library: &LibraryHandle, args: &[FactoryArg<'_>]) -> Result<T> {
        let registration = REGISTRY
            .get(&TypeId::of::<T>())
            .ok_or(Error::UnregisteredCapability {
                type_name: type_name::<T>(),
            })?;
        library.get()?;
        tracing::trace!(ty = registration.type_name, "building wrapper");

        let built = (registration.construct)(library, args)?;
        built
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| Error::UnregisteredCapability {
                type_name: type_name::<T>(),
            })
    }

    /// The capability `T` is registered under, if any.
    pub fn capability_of<T: Any>() -> Option<Capability> {
        REGISTRY.get(&TypeId::of::<T>()).map(|r| r.capability)
    }

    pub fn is_registered<T: Any>() -> bool {
        REGISTRY.contains_key(&TypeId::of::<T>())
    }
}

fn wrong_args(param: &'static str, expected: &str, args: &[FactoryArg<'_>]) -> Error {
    Error::InvalidArgument {
        param,
        reason: format!("expected {expected}, got {args:?}"),
    }
}

pub(crate) fn expect_none(args: &[FactoryArg<'_>]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(wrong_args("args", "no extra arguments", args))
    }
}

pub(crate) fn expect_input<'a>(args: &[FactoryArg<'a>]) -> Result<&'a str> {
    match args {
        [FactoryArg::Input(input)] => Ok(input),
        _ => Err(wrong_args("input", "a media input", args)),
    }
}

pub(crate) fn expect_name<'a>(args: &[FactoryArg<'a>]) -> Result<&'a str> {
    match args {
        [FactoryArg::Name(name)] => Ok(name),
        _ => Err(wrong_args("name", "a service name", args)),
    }
}

pub(crate) fn expect_media_list<'a>(args: &[FactoryArg<'a>]) -> Result<&'a MediaList> {
    match args {
        [FactoryArg::MediaList(list)] => Ok(list),
        _ => Err(wrong_args("media_list", "a media list", args)),
    }
}
