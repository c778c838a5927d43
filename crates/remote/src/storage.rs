use async_trait::async_trait;

use crate::error::Result;
use crate::types::{FolderListing, RemoteEntry, UploadOptions};

/// Remote storage contract - every pCloud operation the filesystem layer uses
///
/// All paths are absolute and slash-separated. Objects are only ever
/// transferred whole: there is no partial read, partial write or append.
#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// List the direct children of a folder, together with the folder's own metadata
    async fn list_folder(&self, path: &str) -> Result<FolderListing>;

    /// Download the full content of a file
    async fn download_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Upload `data` as the full content of the file at `path`
    async fn upload_file(
        &self,
        data: Vec<u8>,
        path: &str,
        options: &UploadOptions,
    ) -> Result<RemoteEntry>;

    /// Create a folder (parent must exist)
    async fn create_folder(&self, path: &str) -> Result<RemoteEntry>;

    /// Delete a file
    async fn delete_file(&self, path: &str) -> Result<()>;

    /// Delete an empty folder
    async fn delete_folder(&self, path: &str) -> Result<()>;

    /// Delete a folder and everything below it
    async fn delete_folder_recursive(&self, path: &str) -> Result<()>;
}
