//! Error types for remote storage operations.

use thiserror::Error;

/// pCloud result codes that mean "the addressed path does not exist"
const NOT_FOUND_CODES: [u64; 3] = [
    2002, // A component of parent directory does not exist
    2005, // Directory does not exist
    2009, // File not found
];

/// Main error type for remote storage operations.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// HTTP request failed with status code.
    #[error("HTTP error: {0}")]
    Http(u16),

    /// Network request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or unexpected response from server.
    #[error("Invalid response from server")]
    InvalidResponse,

    /// pCloud API returned a non-zero result code.
    #[error("API error: {code} - {message}")]
    Api { code: u64, message: String },

    /// Path does not exist in the remote store.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Path already exists in the remote store.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Folder operation on something that is not a folder.
    #[error("Not a folder: {0}")]
    NotAFolder(String),

    /// File operation on something that is not a file.
    #[error("Not a file: {0}")]
    NotAFile(String),

    /// Non-recursive delete of a folder with children.
    #[error("Folder not empty: {0}")]
    FolderNotEmpty(String),

    /// The remote store could not be reached.
    #[error("Remote unavailable: {0}")]
    Unavailable(String),

    /// Missing or malformed client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RemoteError {
    /// Whether this error means the addressed object does not exist,
    /// as opposed to a transport or server failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api { code, .. } => NOT_FOUND_CODES.contains(code),
            Self::Http(status) => *status == 404,
            _ => false,
        }
    }
}

/// Result type alias for remote storage operations.
pub type Result<T> = std::result::Result<T, RemoteError>;
