//! Error handling for the libvlc facade.
//!
//! Every fallible operation returns [`Result`]. [`ErrorKind`] gives callers
//! a stable classification to match on without inspecting messages.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Stable classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The engine library could not be located or bound.
    NativeLibraryNotFound,
    /// The engine library lacks an entry point this crate requires.
    MissingSymbol,
    /// `libvlc_new` returned a null instance.
    InitializationFailed,
    /// The object factory has no constructor for the requested type.
    UnregisteredCapability,
    /// A wrapper was used after its native handle was released.
    StaleHandle,
    /// A string reported by the engine maps to no known enum value.
    UnsupportedEnumValue,
    /// A caller-supplied argument cannot be passed to the engine.
    InvalidArgument,
    /// A native constructor or command reported failure.
    CreationFailed,
    /// Filesystem error while preparing the module directory.
    Io,
}

/// Errors raised at the managed/native boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("libvlc could not be loaded from {path}: {source}")]
    NativeLibraryNotFound {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("libvlc does not export `{symbol}`: {source}")]
    MissingSymbol {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },

    #[error("libvlc_new returned a null instance ({argc} arguments)")]
    InitializationFailed { argc: usize },

    #[error("unregistered type: {type_name}")]
    UnregisteredCapability { type_name: &'static str },

    #[error("{kind} handle used after release")]
    StaleHandle { kind: &'static str },

    #[error("unsupported {enum_name} value `{value}`")]
    UnsupportedEnumValue { enum_name: &'static str, value: String },

    #[error("invalid argument `{param}`: {reason}")]
    InvalidArgument { param: &'static str, reason: String },

    #[error("{operation} failed")]
    CreationFailed { operation: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NativeLibraryNotFound { .. } => ErrorKind::NativeLibraryNotFound,
            Error::MissingSymbol { .. } => ErrorKind::MissingSymbol,
            Error::InitializationFailed { .. } => ErrorKind::InitializationFailed,
            Error::UnregisteredCapability { .. } => ErrorKind::UnregisteredCapability,
            Error::StaleHandle { .. } => ErrorKind::StaleHandle,
            Error::UnsupportedEnumValue { .. } => ErrorKind::UnsupportedEnumValue,
            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Error::CreationFailed { .. } => ErrorKind::CreationFailed,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Create an invalid argument error for a string with an interior NUL.
    pub(crate) fn interior_nul(param: &'static str) -> Self {
        Error::InvalidArgument {
            param,
            reason: "contains an interior NUL byte".to_string(),
        }
    }

    /// Create an unsupported enum value error.
    pub(crate) fn unsupported(enum_name: &'static str, value: impl Into<String>) -> Self {
        Error::UnsupportedEnumValue {
            enum_name,
            value: value.into(),
        }
    }
}
