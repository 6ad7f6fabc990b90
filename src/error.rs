//! Error types for the rtcbridge crate.
//!
//! Nothing here crosses the native boundary. Capability and construction
//! failures are reported as `false` / `None`, and a stats request with no data
//! still completes with an empty report. These errors cover the Rust-side
//! faults: releasing a handle twice, bad configuration, and the like.

use thiserror::Error;

use crate::handle::HandleKind;

/// Result type alias for rtcbridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for rtcbridge operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Handle is zero or was never issued by the engine.
    #[error("invalid {0} handle")]
    InvalidHandle(HandleKind),

    /// Handle was already released through its destroy path.
    #[error("{kind} handle {raw:#x} already released")]
    AlreadyReleased {
        /// Kind of native object.
        kind: HandleKind,
        /// Raw handle value.
        raw: u64,
    },

    /// Engine reported a handle kind it does not know.
    #[error("unknown handle kind: {0}")]
    UnknownHandleKind(i32),

    /// Requested component is not available on this platform or build.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown error.
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl Error {
    /// Check if this is a rejected double release.
    pub fn is_already_released(&self) -> bool {
        matches!(self, Error::AlreadyReleased { .. })
    }

    /// Check if this is an invalid handle error.
    pub fn is_invalid_handle(&self) -> bool {
        matches!(self, Error::InvalidHandle(_))
    }

    /// Check if this is an unsupported component error.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
