//! Error types for the converter.
//!
//! Every failure the pipeline can hit falls into one of five classes. Only
//! `PermissionDenied` and a directory-level `Read` abort a whole batch; the
//! rest are caught at the entry boundary and logged.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Access to the directory was declined or is stale-denied for the session.
    #[error("access to {path} was denied")]
    PermissionDenied { path: PathBuf },

    /// Source file (or the directory listing itself) could not be read.
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    /// Bytes were not a decodable image.
    #[error("failed to decode {name}: {reason}")]
    Decode { name: String, reason: String },

    /// Serialization to the target format produced an error or no data.
    #[error("failed to encode {name} as {mime}: {reason}")]
    Encode {
        name: String,
        mime: String,
        reason: String,
    },

    /// Destination file could not be created or written.
    #[error("failed to write {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    pub fn decode(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn encode(name: impl Into<String>, mime: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encode {
            name: name.into(),
            mime: mime.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
