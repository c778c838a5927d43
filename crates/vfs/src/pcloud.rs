//! pCloud virtual filesystem
//!
//! Maps [`Filesystem`] operations onto pCloud's path-based API:
//! - stat-like queries go through the [`MetadataResolver`] (parent listing + scan)
//! - create/delete map one-to-one onto remote calls, errors passed through
//! - content access goes through [`RemoteFile`] handles
//!
//! pCloud has no rename and no mutable metadata, so `setinfo` is a no-op and
//! `supports_rename` is false in [`FsMeta::PCLOUD`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use pcloudfs_remote::{PCloudClient, PCloudConfig, RemoteEntry, RemoteStorage};
use tracing::debug;

use crate::error::{FsError, FsResult};
use crate::file::RemoteFile;
use crate::filesystem::{FsFile, Filesystem};
use crate::info::{BasicInfo, DetailsInfo, Info, Namespace, Permissions, RawInfo, ResourceType};
use crate::meta::FsMeta;
use crate::mode::Mode;
use crate::resolver::MetadataResolver;

/// A pCloud account as a virtual filesystem
pub struct PCloudFs {
    /// Shared client used by every operation and every open file
    remote: Arc<dyn RemoteStorage>,
    resolver: MetadataResolver,
    meta: FsMeta,
}

impl PCloudFs {
    /// Create over any remote storage implementation
    pub fn new(remote: Arc<dyn RemoteStorage>) -> Self {
        Self {
            resolver: MetadataResolver::new(remote.clone()),
            remote,
            meta: FsMeta::PCLOUD,
        }
    }

    /// Log in with `config` and create over the resulting pCloud client
    pub async fn connect(config: &PCloudConfig) -> FsResult<Self> {
        let client = PCloudClient::login(config).await?;
        Ok(Self::new(Arc::new(client)))
    }

    fn info_from_metadata(entry: &RemoteEntry, namespaces: &[Namespace]) -> Info {
        let basic = BasicInfo {
            name: entry.name.clone(),
            is_dir: entry.isfolder,
        };
        let details = namespaces.contains(&Namespace::Details).then(|| DetailsInfo {
            resource_type: if entry.isfolder {
                ResourceType::Directory
            } else {
                ResourceType::File
            },
            accessed: None,
            modified: entry.modified,
            created: entry.created,
            metadata_changed: entry.modified,
            size: entry.size.unwrap_or(0),
        });
        Info::new(basic, details, namespaces)
    }
}

impl fmt::Display for PCloudFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<pCloudFS>")
    }
}

#[async_trait]
impl Filesystem for PCloudFs {
    fn meta(&self) -> &FsMeta {
        &self.meta
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn getinfo(&self, path: &str, namespaces: &[Namespace]) -> FsResult<Info> {
        let path = self.validatepath(path)?;
        let entry = self.resolver.resolve(&path).await?;
        Ok(Self::info_from_metadata(&entry, namespaces))
    }

    async fn setinfo(&self, path: &str, _info: &RawInfo) -> FsResult<()> {
        // pCloud doesn't support changing any metadata values
        debug!(path, "setinfo ignored");
        Ok(())
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn listdir(&self, path: &str) -> FsResult<Vec<String>> {
        let path = self.validatepath(path)?;

        if self.gettype(&path).await? != ResourceType::Directory {
            return Err(FsError::DirectoryExpected { path });
        }

        let listing = self
            .remote
            .list_folder(&path)
            .await
            .map_err(|e| FsError::not_found_caused_by(path.as_str(), e))?;
        Ok(listing.metadata.contents.into_iter().map(|e| e.name).collect())
    }

    #[tracing::instrument(skip(self, _permissions), level = "debug")]
    async fn makedir(
        &self,
        path: &str,
        _permissions: Option<Permissions>,
        recreate: bool,
    ) -> FsResult<()> {
        let path = self.validatepath(path)?;
        match self.remote.create_folder(&path).await {
            Ok(_) => Ok(()),
            Err(e) if recreate => {
                if self.isdir(&path).await? {
                    debug!(path = %path, "Directory already exists, recreate allowed");
                    Ok(())
                } else {
                    Err(e.into())
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn openbin(
        &self,
        path: &str,
        mode: &str,
        _buffering: Option<usize>,
    ) -> FsResult<Box<dyn FsFile>> {
        let path = self.validatepath(path)?;
        let mode = Mode::binary(mode)?;
        let file = RemoteFile::open(self.remote.clone(), path, mode).await;
        Ok(Box::new(file))
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn remove(&self, path: &str) -> FsResult<()> {
        let path = self.validatepath(path)?;
        Ok(self.remote.delete_file(&path).await?)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn removedir(&self, path: &str) -> FsResult<()> {
        let path = self.validatepath(path)?;
        Ok(self.remote.delete_folder(&path).await?)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn removetree(&self, path: &str) -> FsResult<()> {
        let path = self.validatepath(path)?;
        Ok(self.remote.delete_folder_recursive(&path).await?)
    }
}
