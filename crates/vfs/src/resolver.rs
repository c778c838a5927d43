//! Metadata resolution by parent listing
//!
//! pCloud has no call that stats a single path. A node's metadata is found
//! by listing its parent folder and scanning the children for a matching
//! path. Nothing is cached: every lookup costs one listing, so results are
//! never stale.

use std::sync::Arc;

use pcloudfs_remote::{RemoteEntry, RemoteStorage};
use tracing::debug;

use crate::error::{FsError, FsResult};
use crate::path;

/// Looks up single nodes through folder listings
pub struct MetadataResolver {
    remote: Arc<dyn RemoteStorage>,
}

impl MetadataResolver {
    pub fn new(remote: Arc<dyn RemoteStorage>) -> Self {
        Self { remote }
    }

    /// Resolve the metadata of a normalized absolute path
    ///
    /// A failed listing (missing parent, transport or auth failure) and a
    /// listing without a matching entry both yield `ResourceNotFound`; the
    /// remote error, if any, is kept as its source.
    pub async fn resolve(&self, path: &str) -> FsResult<RemoteEntry> {
        let parent = path::parent(path);

        let listing = self.remote.list_folder(&parent).await.map_err(|e| {
            debug!(path, parent = %parent, error = %e, "Parent listing failed");
            FsError::not_found_caused_by(path, e)
        })?;

        if path::is_root(path) {
            return Ok(listing.metadata);
        }

        listing
            .metadata
            .contents
            .into_iter()
            .find(|entry| entry_matches(&parent, entry, path))
            .ok_or_else(|| FsError::not_found(path))
    }
}

/// Listings requested by path carry full paths; fall back to parent + name
fn entry_matches(parent: &str, entry: &RemoteEntry, path: &str) -> bool {
    entry.path.as_ref().map_or_else(
        || path::join(parent, &entry.name) == path,
        |entry_path| entry_path == path,
    )
}
