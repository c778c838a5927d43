//! Wire types shared by every `RemoteStorage` implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata of a single file or folder, as reported in folder listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Absolute path (present when the listing was requested by path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub name: String,
    #[serde(default)]
    pub isfolder: bool,
    /// Size in bytes (files only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, with = "rfc2822", skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, with = "rfc2822", skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folderid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fileid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contenttype: Option<String>,
    /// Direct children (folder listings only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<RemoteEntry>,
}

impl RemoteEntry {
    /// Create a folder entry
    pub fn folder(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            name: name.into(),
            isfolder: true,
            ..Self::default()
        }
    }

    /// Create a file entry
    pub fn file(path: impl Into<String>, name: impl Into<String>, size: u64) -> Self {
        Self {
            path: Some(path.into()),
            name: name.into(),
            isfolder: false,
            size: Some(size),
            ..Self::default()
        }
    }

    /// Set both timestamps
    #[must_use]
    pub fn with_times(mut self, created: DateTime<Utc>, modified: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self.modified = Some(modified);
        self
    }
}

/// Response of a folder listing: the folder's own metadata with its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderListing {
    pub metadata: RemoteEntry,
}

impl FolderListing {
    /// Direct children of the listed folder, in listing order
    pub fn entries(&self) -> &[RemoteEntry] {
        &self.metadata.contents
    }
}

/// Options for whole-object uploads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Rename the upload instead of replacing an existing object
    pub autorename: bool,
    /// Modification time to record on the remote object
    pub client_modified: Option<DateTime<Utc>>,
}

impl UploadOptions {
    /// Replace whatever is stored at the target path
    pub const fn overwrite() -> Self {
        Self {
            autorename: false,
            client_modified: None,
        }
    }

    #[must_use]
    pub fn modified_at(mut self, modified: DateTime<Utc>) -> Self {
        self.client_modified = Some(modified);
        self
    }
}

/// pCloud reports timestamps as RFC 2822 strings
mod rfc2822 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc2822()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| {
            DateTime::parse_from_rfc2822(&s)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}
