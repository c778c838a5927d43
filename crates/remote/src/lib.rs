//! Remote storage layer for pcloudfs
//!
//! - [`RemoteStorage`]: the path-based operations the filesystem layer consumes
//! - [`PCloudClient`]: the pCloud HTTP JSON API implementation
//! - [`MemoryRemote`]: an in-memory implementation for tests

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
mod paths;
pub mod storage;
pub mod types;

pub use client::PCloudClient;
pub use config::PCloudConfig;
pub use error::{RemoteError, Result};
pub use memory::{CallStats, MemoryRemote};
pub use storage::RemoteStorage;
pub use types::{FolderListing, RemoteEntry, UploadOptions};
