//! Resource info, grouped by namespace
//!
//! - `basic`: always present (`name`, `is_dir`)
//! - `details`: type, timestamps, size
//! - `link`, `access`: recognized, but pCloud has nothing to put in them

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::error::FsError;

/// Raw info as a namespace -> attributes map
pub type RawInfo = Map<String, Value>;

/// Info namespaces a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Basic,
    Details,
    Link,
    Access,
}

impl Namespace {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Details => "details",
            Self::Link => "link",
            Self::Access => "access",
        }
    }
}

impl FromStr for Namespace {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "details" => Ok(Self::Details),
            "link" => Ok(Self::Link),
            "access" => Ok(Self::Access),
            other => Err(FsError::UnknownNamespace(other.to_string())),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource type codes of the `details` namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResourceType {
    Unknown = 0,
    Directory = 1,
    File = 2,
}

impl ResourceType {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// POSIX-style permission bits (accepted, never enforced by pCloud)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions(pub u32);

impl Default for Permissions {
    fn default() -> Self {
        Self(0o777)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicInfo {
    pub name: String,
    pub is_dir: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsInfo {
    pub resource_type: ResourceType,
    /// Never tracked remotely
    pub accessed: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub metadata_changed: Option<DateTime<Utc>>,
    pub size: u64,
}

/// Information about a single resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub basic: BasicInfo,
    pub details: Option<DetailsInfo>,
    /// Namespaces this info was built for (basic is implied)
    namespaces: Vec<Namespace>,
}

impl Info {
    pub fn new(basic: BasicInfo, details: Option<DetailsInfo>, namespaces: &[Namespace]) -> Self {
        let mut namespaces: Vec<Namespace> = namespaces
            .iter()
            .copied()
            .chain(std::iter::once(Namespace::Basic))
            .collect();
        if details.is_some() {
            namespaces.push(Namespace::Details);
        }
        namespaces.sort();
        namespaces.dedup();
        Self {
            basic,
            details,
            namespaces,
        }
    }

    pub fn name(&self) -> &str {
        &self.basic.name
    }

    pub const fn is_dir(&self) -> bool {
        self.basic.is_dir
    }

    pub const fn is_file(&self) -> bool {
        !self.basic.is_dir
    }

    pub fn has_namespace(&self, namespace: Namespace) -> bool {
        self.namespaces.contains(&namespace)
    }

    /// `None` unless the `details` namespace was requested
    pub fn resource_type(&self) -> Option<ResourceType> {
        self.details.as_ref().map(|d| d.resource_type)
    }

    pub fn size(&self) -> Option<u64> {
        self.details.as_ref().map(|d| d.size)
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.details.as_ref().and_then(|d| d.modified)
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.details.as_ref().and_then(|d| d.created)
    }

    pub fn accessed(&self) -> Option<DateTime<Utc>> {
        self.details.as_ref().and_then(|d| d.accessed)
    }

    /// Raw namespace map; timestamps as Unix epoch seconds, unknown ones as null
    pub fn to_raw(&self) -> RawInfo {
        let mut raw = RawInfo::new();
        raw.insert(
            Namespace::Basic.as_str().into(),
            json!({ "name": self.basic.name, "is_dir": self.basic.is_dir }),
        );
        if let Some(details) = &self.details {
            let epoch = |ts: Option<DateTime<Utc>>| ts.map(|t| t.timestamp());
            raw.insert(
                Namespace::Details.as_str().into(),
                json!({
                    "type": details.resource_type.code(),
                    "accessed": epoch(details.accessed),
                    "modified": epoch(details.modified),
                    "created": epoch(details.created),
                    "metadata_changed": epoch(details.metadata_changed),
                    "size": details.size,
                }),
            );
        }
        for namespace in [Namespace::Link, Namespace::Access] {
            if self.has_namespace(namespace) {
                raw.insert(namespace.as_str().into(), Value::Object(Map::new()));
            }
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(name: &str, is_dir: bool) -> BasicInfo {
        BasicInfo {
            name: name.into(),
            is_dir,
        }
    }

    #[test]
    fn basic_only_info() {
        let info = Info::new(basic("a.txt", false), None, &[]);
        assert!(info.is_file());
        assert!(info.has_namespace(Namespace::Basic));
        assert!(!info.has_namespace(Namespace::Details));
        assert_eq!(info.size(), None);
        assert_eq!(info.resource_type(), None);

        let raw = info.to_raw();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw["basic"]["name"], "a.txt");
    }

    #[test]
    fn raw_details_and_empty_namespaces() {
        let details = DetailsInfo {
            resource_type: ResourceType::Directory,
            accessed: None,
            modified: DateTime::from_timestamp(1_600_000_000, 0),
            created: None,
            metadata_changed: None,
            size: 0,
        };
        let info = Info::new(
            basic("docs", true),
            Some(details),
            &[Namespace::Details, Namespace::Link, Namespace::Access],
        );

        let raw = info.to_raw();
        assert_eq!(raw["details"]["type"], 1);
        assert_eq!(raw["details"]["modified"], 1_600_000_000);
        assert!(raw["details"]["accessed"].is_null());
        assert_eq!(raw["link"], json!({}));
        assert_eq!(raw["access"], json!({}));
    }

    #[test]
    fn parses_namespaces() {
        assert_eq!("details".parse::<Namespace>().unwrap(), Namespace::Details);
        assert!("stat".parse::<Namespace>().is_err());
        assert_eq!(ResourceType::File.code(), 2);
    }
}
