use std::io::{Read, Seek, Write};

use async_trait::async_trait;

use crate::error::{FsError, FsResult};
use crate::info::{Info, Namespace, Permissions, RawInfo, ResourceType};
use crate::meta::FsMeta;
use crate::mode::Mode;
use crate::path;

/// Open file handle returned by [`Filesystem::openbin`]
///
/// Reading, writing and seeking are synchronous; only `close` may touch
/// the backing store. Every operation on a closed handle fails.
#[async_trait]
pub trait FsFile: Read + Write + Seek + Send {
    /// Path the handle is bound to (`None` once closed)
    fn path(&self) -> Option<&str>;

    /// Mode the handle was opened with (`None` once closed)
    fn mode(&self) -> Option<&Mode>;

    fn is_closed(&self) -> bool;

    /// Flush pending content to the store and release the handle
    async fn close(&mut self) -> FsResult<()>;
}

/// Hierarchical filesystem contract
///
/// Paths are absolute and slash-separated. Implementations validate and
/// normalize every incoming path through [`Filesystem::validatepath`].
///
/// The provided methods build on the required ones, so a backend only has
/// to implement the core operations.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Static capability flags
    fn meta(&self) -> &FsMeta;

    /// Get info about a resource, with the requested namespaces
    async fn getinfo(&self, path: &str, namespaces: &[Namespace]) -> FsResult<Info>;

    /// Set info on a resource
    async fn setinfo(&self, path: &str, info: &RawInfo) -> FsResult<()>;

    /// Names of the direct children of a directory
    async fn listdir(&self, path: &str) -> FsResult<Vec<String>>;

    /// Create a directory
    async fn makedir(
        &self,
        path: &str,
        permissions: Option<Permissions>,
        recreate: bool,
    ) -> FsResult<()>;

    /// Open a binary file
    async fn openbin(
        &self,
        path: &str,
        mode: &str,
        buffering: Option<usize>,
    ) -> FsResult<Box<dyn FsFile>>;

    /// Remove a file
    async fn remove(&self, path: &str) -> FsResult<()>;

    /// Remove an empty directory
    async fn removedir(&self, path: &str) -> FsResult<()>;

    /// Remove a directory and all of its contents
    async fn removetree(&self, path: &str) -> FsResult<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Provided operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Check a path for invalid characters and return it normalized
    fn validatepath(&self, path: &str) -> FsResult<String> {
        let meta = self.meta();
        if path.chars().any(|c| meta.invalid_path_chars.contains(c)) {
            return Err(FsError::InvalidCharsInPath {
                path: path.to_string(),
            });
        }
        path::normalize(path)
    }

    /// Type of a resource, from its `details` namespace
    async fn gettype(&self, path: &str) -> FsResult<ResourceType> {
        let info = self.getinfo(path, &[Namespace::Details]).await?;
        Ok(info.resource_type().unwrap_or(ResourceType::Unknown))
    }

    /// Check if a resource exists
    async fn exists(&self, path: &str) -> FsResult<bool> {
        match self.getinfo(path, &[]).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn isdir(&self, path: &str) -> FsResult<bool> {
        match self.getinfo(path, &[]).await {
            Ok(info) => Ok(info.is_dir()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn isfile(&self, path: &str) -> FsResult<bool> {
        match self.getinfo(path, &[]).await {
            Ok(info) => Ok(info.is_file()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Read the entire content of an existing file
    async fn readbytes(&self, path: &str) -> FsResult<Vec<u8>> {
        if self.gettype(path).await? != ResourceType::File {
            return Err(FsError::FileExpected {
                path: path.to_string(),
            });
        }
        let mut file = self.openbin(path, "rb", None).await?;
        let mut data = Vec::new();
        let read = file.read_to_end(&mut data);
        file.close().await?;
        read?;
        Ok(data)
    }

    /// Replace the content of a file, creating it if needed
    async fn writebytes(&self, path: &str, data: &[u8]) -> FsResult<()> {
        let mut file = self.openbin(path, "wb", None).await?;
        file.write_all(data)?;
        file.close().await
    }

    /// Append to a file, creating it if needed
    async fn appendbytes(&self, path: &str, data: &[u8]) -> FsResult<()> {
        let mut file = self.openbin(path, "ab", None).await?;
        file.write_all(data)?;
        file.close().await
    }

    /// Create a directory along with any missing ancestors
    async fn makedirs(
        &self,
        path: &str,
        permissions: Option<Permissions>,
        recreate: bool,
    ) -> FsResult<()> {
        let path = self.validatepath(path)?;
        for ancestor in path::ancestors(&path) {
            if !path::is_root(&ancestor) && !self.isdir(&ancestor).await? {
                self.makedir(&ancestor, permissions, false).await?;
            }
        }
        self.makedir(&path, permissions, recreate).await
    }
}
