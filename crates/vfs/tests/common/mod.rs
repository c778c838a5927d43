//! Common test utilities
#![allow(dead_code)] // Not every helper is used by every test file

use std::sync::Arc;

use pcloudfs_remote::MemoryRemote;
use pcloudfs_vfs::PCloudFs;

/// A `PCloudFs` wired to an in-memory remote the test can inspect
pub struct TestHarness {
    pub remote: MemoryRemote,
    pub fs: PCloudFs,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_files(vec![])
    }

    pub fn with_files(files: Vec<(&str, &[u8])>) -> Self {
        let remote = MemoryRemote::with_files(files);
        let fs = PCloudFs::new(Arc::new(remote.clone()));
        Self { remote, fs }
    }

    pub fn contents(&self, path: &str) -> Vec<u8> {
        self.remote
            .contents(path)
            .unwrap_or_else(|| panic!("no remote file at {path}"))
    }
}
