//! Filesystem error vocabulary.
//!
//! Navigation and stat failures are always normalized to
//! [`FsError::ResourceNotFound`]; failures of direct remote mutations
//! (create, delete, upload) pass through untouched as [`FsError::Remote`].

use pcloudfs_remote::RemoteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsError {
    /// Path could not be located, or its parent could not be listed
    #[error("resource '{path}' not found")]
    ResourceNotFound {
        path: String,
        #[source]
        source: Option<RemoteError>,
    },

    /// Directory-only operation on something that is not a directory
    #[error("path '{path}' should be a directory")]
    DirectoryExpected { path: String },

    /// File-only operation on something that is not a file
    #[error("path '{path}' should be a file")]
    FileExpected { path: String },

    /// Remote create/delete/upload/download failure, untranslated
    #[error("remote operation failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("path '{path}' contains invalid characters")]
    InvalidCharsInPath { path: String },

    /// `..` would climb above the root
    #[error("path '{path}' contains back-references outside of filesystem")]
    IllegalBackReference { path: String },

    #[error("invalid mode: {0}")]
    InvalidMode(String),

    #[error("unknown info namespace '{0}'")]
    UnknownNamespace(String),

    /// Operation on a file handle after it was closed
    #[error("I/O operation on closed file")]
    FileClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Not-found that keeps the remote failure behind it for diagnostics
    pub fn not_found_caused_by(path: impl Into<String>, source: RemoteError) -> Self {
        Self::ResourceNotFound {
            path: path.into(),
            source: Some(source),
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}

pub type FsResult<T> = std::result::Result<T, FsError>;
