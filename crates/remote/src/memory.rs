//! In-memory remote storage for testing
//!
//! Mimics the pCloud storage model without any network: folders and files
//! addressed by absolute path, whole-object upload/download, listings in
//! creation order. Useful for tests that need a `RemoteStorage` without
//! an account.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};

use crate::error::{RemoteError, Result};
use crate::paths::{normalize_path, split_path};
use crate::storage::RemoteStorage;
use crate::types::{FolderListing, RemoteEntry, UploadOptions};

/// In-memory object entry
#[derive(Clone, Debug)]
enum MemoryObject {
    File(Vec<u8>),
    Folder,
}

#[derive(Clone, Debug)]
struct MemoryNode {
    object: MemoryObject,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
    /// Creation order, used to keep listings stable
    seq: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    nodes: HashMap<String, MemoryNode>,
    next_seq: u64,
}

/// Number of calls made per remote operation
#[derive(Debug, Default)]
pub struct CallStats {
    pub list_folder: AtomicUsize,
    pub download_file: AtomicUsize,
    pub upload_file: AtomicUsize,
    pub create_folder: AtomicUsize,
    pub delete_file: AtomicUsize,
    pub delete_folder: AtomicUsize,
    pub delete_folder_recursive: AtomicUsize,
}

impl CallStats {
    /// Total number of remote calls of any kind
    pub fn total(&self) -> usize {
        [
            &self.list_folder,
            &self.download_file,
            &self.upload_file,
            &self.create_folder,
            &self.delete_file,
            &self.delete_folder,
            &self.delete_folder_recursive,
        ]
        .iter()
        .map(|c| c.load(Ordering::SeqCst))
        .sum()
    }

    pub fn uploads(&self) -> usize {
        self.upload_file.load(Ordering::SeqCst)
    }

    pub fn listings(&self) -> usize {
        self.list_folder.load(Ordering::SeqCst)
    }

    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory remote storage
///
/// All data is stored in memory and lost when the last clone is dropped.
/// Clones share state, so a test can keep one handle for inspection while
/// the filesystem under test owns another.
#[derive(Clone)]
pub struct MemoryRemote {
    state: Arc<RwLock<MemoryState>>,
    stats: Arc<CallStats>,
    /// When set, every call fails as if the service were unreachable
    offline: Arc<AtomicBool>,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    /// Create an empty store containing only the root folder
    pub fn new() -> Self {
        let mut state = MemoryState::default();
        let now = now();
        state.nodes.insert(
            "/".to_string(),
            MemoryNode {
                object: MemoryObject::Folder,
                created: now,
                modified: now,
                seq: 0,
            },
        );
        state.next_seq = 1;
        Self {
            state: Arc::new(RwLock::new(state)),
            stats: Arc::new(CallStats::default()),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create with initial file contents (parent folders are created as needed)
    pub fn with_files(files: Vec<(&str, &[u8])>) -> Self {
        let remote = Self::new();
        {
            let mut state = remote.state.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            for (path, content) in files {
                let path = normalize_path(path);
                let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
                let mut current = String::new();
                for part in &parts[..parts.len().saturating_sub(1)] {
                    current = format!("{current}/{part}");
                    if !state.nodes.contains_key(&current) {
                        state.insert(current.clone(), MemoryObject::Folder);
                    }
                }
                state.insert(path, MemoryObject::File(content.to_vec()));
            }
        }
        remote
    }

    /// Per-operation call counters
    pub fn stats(&self) -> &CallStats {
        &self.stats
    }

    /// Simulate the service becoming unreachable (or reachable again)
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Read a file directly, bypassing call accounting
    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        let state = self.state.read().ok()?;
        match state.nodes.get(&normalize_path(path)) {
            Some(MemoryNode {
                object: MemoryObject::File(data),
                ..
            }) => Some(data.clone()),
            _ => None,
        }
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("memory remote is offline".into()));
        }
        Ok(())
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| RemoteError::Unavailable("lock poisoned".into()))
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| RemoteError::Unavailable("lock poisoned".into()))
    }
}

impl MemoryState {
    fn insert(&mut self, path: String, object: MemoryObject) {
        let now = now();
        let seq = self.next_seq;
        self.next_seq += 1;
        self.nodes.insert(
            path,
            MemoryNode {
                object,
                created: now,
                modified: now,
                seq,
            },
        );
    }

    fn require_folder(&self, path: &str) -> Result<()> {
        match self.nodes.get(path) {
            Some(MemoryNode {
                object: MemoryObject::Folder,
                ..
            }) => Ok(()),
            Some(_) => Err(RemoteError::NotAFolder(path.to_string())),
            None => Err(RemoteError::NotFound(path.to_string())),
        }
    }

    fn entry(&self, path: &str, node: &MemoryNode) -> RemoteEntry {
        let name = split_path(path).map_or_else(|| "/".to_string(), |(_, name)| name);
        let mut entry = match &node.object {
            MemoryObject::File(data) => RemoteEntry::file(path, name, data.len() as u64),
            MemoryObject::Folder => RemoteEntry::folder(path, name),
        };
        entry.created = Some(node.created);
        entry.modified = Some(node.modified);
        entry
    }

    /// Paths of direct children, in creation order
    fn children(&self, path: &str) -> Vec<String> {
        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{path}/")
        };
        let mut children: Vec<(&String, u64)> = self
            .nodes
            .iter()
            .filter(|(key, _)| {
                key.len() > prefix.len()
                    && key.starts_with(&prefix)
                    && !key[prefix.len()..].contains('/')
            })
            .map(|(key, node)| (key, node.seq))
            .collect();
        children.sort_by_key(|(_, seq)| *seq);
        children.into_iter().map(|(key, _)| key.clone()).collect()
    }

    /// Pick a free name for an autorenamed upload: `a.txt` -> `a (1).txt`
    fn free_path(&self, parent: &str, name: &str) -> String {
        let (stem, ext) = match name.rfind('.') {
            Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
            _ => (name, ""),
        };
        let join = |n: &str| {
            if parent == "/" {
                format!("/{n}")
            } else {
                format!("{parent}/{n}")
            }
        };
        (1..)
            .map(|i| join(&format!("{stem} ({i}){ext}")))
            .find(|candidate| !self.nodes.contains_key(candidate))
            .unwrap_or_else(|| join(name))
    }
}

/// pCloud timestamps have second granularity
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

#[async_trait]
impl RemoteStorage for MemoryRemote {
    async fn list_folder(&self, path: &str) -> Result<FolderListing> {
        CallStats::bump(&self.stats.list_folder);
        self.check_online()?;
        let path = normalize_path(path);
        let state = self.read_state()?;

        state.require_folder(&path)?;
        let node = &state.nodes[&path];
        let mut metadata = state.entry(&path, node);
        metadata.contents = state
            .children(&path)
            .iter()
            .map(|child| state.entry(child, &state.nodes[child]))
            .collect();

        Ok(FolderListing { metadata })
    }

    async fn download_file(&self, path: &str) -> Result<Vec<u8>> {
        CallStats::bump(&self.stats.download_file);
        self.check_online()?;
        let path = normalize_path(path);
        let state = self.read_state()?;

        match state.nodes.get(&path) {
            Some(MemoryNode {
                object: MemoryObject::File(data),
                ..
            }) => Ok(data.clone()),
            Some(_) => Err(RemoteError::NotAFile(path)),
            None => Err(RemoteError::NotFound(path)),
        }
    }

    async fn upload_file(
        &self,
        data: Vec<u8>,
        path: &str,
        options: &UploadOptions,
    ) -> Result<RemoteEntry> {
        CallStats::bump(&self.stats.upload_file);
        self.check_online()?;
        let (parent, name) =
            split_path(path).ok_or_else(|| RemoteError::NotAFile(normalize_path(path)))?;
        let mut path = normalize_path(path);
        let mut state = self.write_state()?;

        state.require_folder(&parent)?;

        let existing = state.nodes.get(&path).cloned();
        if let Some(node) = &existing {
            if matches!(node.object, MemoryObject::Folder) {
                return Err(RemoteError::AlreadyExists(path));
            }
            if options.autorename {
                path = state.free_path(&parent, &name);
            }
        }

        let modified = options.client_modified.unwrap_or_else(now);
        match existing {
            Some(mut node) if !options.autorename => {
                node.object = MemoryObject::File(data);
                node.modified = modified;
                state.nodes.insert(path.clone(), node);
            }
            _ => {
                state.insert(path.clone(), MemoryObject::File(data));
                if let Some(node) = state.nodes.get_mut(&path) {
                    node.modified = modified;
                }
            }
        }

        let node = &state.nodes[&path];
        Ok(state.entry(&path, node))
    }

    async fn create_folder(&self, path: &str) -> Result<RemoteEntry> {
        CallStats::bump(&self.stats.create_folder);
        self.check_online()?;
        let (parent, _) =
            split_path(path).ok_or_else(|| RemoteError::AlreadyExists("/".to_string()))?;
        let path = normalize_path(path);
        let mut state = self.write_state()?;

        state.require_folder(&parent)?;
        if state.nodes.contains_key(&path) {
            return Err(RemoteError::AlreadyExists(path));
        }
        state.insert(path.clone(), MemoryObject::Folder);

        let node = &state.nodes[&path];
        Ok(state.entry(&path, node))
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        CallStats::bump(&self.stats.delete_file);
        self.check_online()?;
        let path = normalize_path(path);
        let mut state = self.write_state()?;

        match state.nodes.get(&path) {
            Some(MemoryNode {
                object: MemoryObject::File(_),
                ..
            }) => {
                state.nodes.remove(&path);
                Ok(())
            }
            Some(_) => Err(RemoteError::NotAFile(path)),
            None => Err(RemoteError::NotFound(path)),
        }
    }

    async fn delete_folder(&self, path: &str) -> Result<()> {
        CallStats::bump(&self.stats.delete_folder);
        self.check_online()?;
        let path = normalize_path(path);
        let mut state = self.write_state()?;

        if path == "/" {
            return Err(RemoteError::NotAFolder(path));
        }
        state.require_folder(&path)?;
        if !state.children(&path).is_empty() {
            return Err(RemoteError::FolderNotEmpty(path));
        }
        state.nodes.remove(&path);
        Ok(())
    }

    async fn delete_folder_recursive(&self, path: &str) -> Result<()> {
        CallStats::bump(&self.stats.delete_folder_recursive);
        self.check_online()?;
        let path = normalize_path(path);
        let mut state = self.write_state()?;

        if path == "/" {
            return Err(RemoteError::NotAFolder(path));
        }
        state.require_folder(&path)?;
        let prefix = format!("{path}/");
        state
            .nodes
            .retain(|key, _| key != &path && !key.starts_with(&prefix));
        Ok(())
    }
}
