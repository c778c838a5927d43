mod common;

use std::io::{Read, Seek, SeekFrom, Write};

use common::TestHarness;
use pcloudfs_remote::{RemoteError, RemoteStorage};
use pcloudfs_vfs::{Filesystem, FsError, Namespace, RawInfo, ResourceType};
use serde_json::json;

/// getinfo reports the attributes of the matching listing entry
#[tokio::test]
async fn getinfo_matches_listing_entry() {
    let h = TestHarness::with_files(vec![("/docs/report.pdf", b"%PDF-1.7")]);

    let info = h
        .fs
        .getinfo("/docs/report.pdf", &[Namespace::Details])
        .await
        .unwrap();
    assert_eq!(info.name(), "report.pdf");
    assert!(info.is_file());
    assert_eq!(info.resource_type(), Some(ResourceType::File));
    assert_eq!(info.size(), Some(8));
    assert_eq!(info.accessed(), None);

    let listing = h.remote.list_folder("/docs").await.unwrap();
    let entry = listing
        .entries()
        .iter()
        .find(|e| e.name == "report.pdf")
        .unwrap();
    assert!(entry.modified.is_some());
    assert_eq!(info.modified(), entry.modified);
    assert_eq!(info.created(), entry.created);
    assert_eq!(info.size(), entry.size);

    let dir = h.fs.getinfo("/docs/", &[]).await.unwrap();
    assert!(dir.is_dir());
    assert_eq!(dir.name(), "docs");
    assert!(dir.details.is_none());
}

#[tokio::test]
async fn getinfo_root() {
    let h = TestHarness::new();
    let info = h.fs.getinfo("/", &[Namespace::Details]).await.unwrap();
    assert!(info.is_dir());
    assert_eq!(info.resource_type(), Some(ResourceType::Directory));
}

#[tokio::test]
async fn getinfo_link_and_access_are_empty() {
    let h = TestHarness::with_files(vec![("/a.txt", b"a")]);
    let info = h
        .fs
        .getinfo("/a.txt", &[Namespace::Link, Namespace::Access])
        .await
        .unwrap();

    let raw = info.to_raw();
    assert_eq!(raw["link"], json!({}));
    assert_eq!(raw["access"], json!({}));
    assert!(!raw.contains_key("details"));
}

/// Absent paths and unlistable parents are both ResourceNotFound
#[tokio::test]
async fn getinfo_missing_is_not_found() {
    let h = TestHarness::with_files(vec![("/docs/a.txt", b"a")]);

    assert!(matches!(
        h.fs.getinfo("/docs/b.txt", &[]).await,
        Err(FsError::ResourceNotFound { .. })
    ));
    assert!(matches!(
        h.fs.getinfo("/nowhere/b.txt", &[]).await,
        Err(FsError::ResourceNotFound { .. })
    ));

    h.remote.set_offline(true);
    assert!(matches!(
        h.fs.getinfo("/docs/a.txt", &[]).await,
        Err(FsError::ResourceNotFound { .. })
    ));
}

#[tokio::test]
async fn exists_isdir_isfile() {
    let h = TestHarness::with_files(vec![("/docs/a.txt", b"a")]);

    assert!(h.fs.exists("/docs").await.unwrap());
    assert!(h.fs.isdir("/docs").await.unwrap());
    assert!(!h.fs.isfile("/docs").await.unwrap());
    assert!(h.fs.isfile("/docs/a.txt").await.unwrap());
    assert!(!h.fs.exists("/docs/b.txt").await.unwrap());
    assert!(!h.fs.isdir("/nowhere").await.unwrap());
}

/// listdir returns names of one listing, in listing order
#[tokio::test]
async fn listdir_preserves_listing_order() {
    let h = TestHarness::new();
    h.fs.makedir("/photos", None, false).await.unwrap();
    h.fs.writebytes("/photos/zebra.jpg", b"z").await.unwrap();
    h.fs.writebytes("/photos/apple.jpg", b"a").await.unwrap();
    h.fs.makedir("/photos/2024", None, false).await.unwrap();

    let names = h.fs.listdir("/photos").await.unwrap();
    assert_eq!(names, vec!["zebra.jpg", "apple.jpg", "2024"]);
}

#[tokio::test]
async fn listdir_on_file_is_directory_expected() {
    let h = TestHarness::with_files(vec![("/a.txt", b"a")]);

    assert!(matches!(
        h.fs.listdir("/a.txt").await,
        Err(FsError::DirectoryExpected { ref path }) if path == "/a.txt"
    ));
    assert!(matches!(
        h.fs.listdir("/missing").await,
        Err(FsError::ResourceNotFound { .. })
    ));
}

#[tokio::test]
async fn listdir_empty_root() {
    let h = TestHarness::new();
    assert!(h.fs.listdir("/").await.unwrap().is_empty());
}

/// Read-only handles never upload
#[tokio::test]
async fn read_open_close_does_not_upload() {
    let h = TestHarness::with_files(vec![("/notes.md", b"# Notes")]);

    let mut file = h.fs.openbin("/notes.md", "r", None).await.unwrap();
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    assert_eq!(data, b"# Notes");
    file.close().await.unwrap();

    assert_eq!(h.remote.stats().uploads(), 0);
    assert_eq!(h.fs.readbytes("/notes.md").await.unwrap(), b"# Notes");
}

/// Writing a new path creates it on close
#[tokio::test]
async fn write_new_path_then_read_back() {
    let h = TestHarness::new();

    let mut file = h.fs.openbin("/new.bin", "wb", None).await.unwrap();
    file.write_all(&[0, 1, 2, 3]).unwrap();
    // Nothing reaches the remote before close
    assert!(h.remote.contents("/new.bin").is_none());
    file.close().await.unwrap();

    let mut file = h.fs.openbin("/new.bin", "rb", None).await.unwrap();
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    file.close().await.unwrap();
    assert_eq!(data, vec![0, 1, 2, 3]);
}

/// Append mode continues after existing content
#[tokio::test]
async fn append_extends_existing_content() {
    let h = TestHarness::with_files(vec![("/log.txt", b"line 1\n")]);

    let mut file = h.fs.openbin("/log.txt", "ab", None).await.unwrap();
    assert_eq!(file.stream_position().unwrap(), 7);
    file.write_all(b"line 2\n").unwrap();
    file.close().await.unwrap();

    assert_eq!(h.contents("/log.txt"), b"line 1\nline 2\n");

    h.fs.appendbytes("/log.txt", b"line 3\n").await.unwrap();
    assert_eq!(h.contents("/log.txt"), b"line 1\nline 2\nline 3\n");
}

#[tokio::test]
async fn read_plus_mode_seeks_and_overwrites() {
    let h = TestHarness::with_files(vec![("/a.txt", b"abcdef")]);

    let mut file = h.fs.openbin("/a.txt", "r+b", None).await.unwrap();
    file.seek(SeekFrom::End(-2)).unwrap();
    file.write_all(b"XYZ").unwrap();
    file.close().await.unwrap();

    assert_eq!(h.contents("/a.txt"), b"abcdXYZ");
}

/// A closed handle rejects every further operation
#[tokio::test]
async fn closed_handle_is_inert() {
    let h = TestHarness::with_files(vec![("/a.txt", b"abc")]);

    let mut file = h.fs.openbin("/a.txt", "r+", None).await.unwrap();
    file.close().await.unwrap();

    assert!(file.is_closed());
    assert!(file.path().is_none());
    assert!(file.read(&mut [0u8; 3]).is_err());
    assert!(file.write(b"x").is_err());
    assert!(file.seek(SeekFrom::Start(0)).is_err());
    assert!(matches!(file.close().await, Err(FsError::FileClosed)));
    assert_eq!(h.remote.stats().uploads(), 1);
}

/// setinfo succeeds without any remote call
#[tokio::test]
async fn setinfo_is_a_silent_no_op() {
    let h = TestHarness::new();

    let mut info = RawInfo::new();
    info.insert("details".into(), json!({ "modified": 0, "accessed": 0 }));
    info.insert("access".into(), json!({ "permissions": ["u_r"] }));

    h.fs.setinfo("/does/not/exist", &info).await.unwrap();
    h.fs.setinfo("/", &RawInfo::new()).await.unwrap();
    assert_eq!(h.remote.stats().total(), 0);
}

/// Two writers on one path: the last close wins
#[tokio::test]
async fn last_writer_to_close_wins() {
    let h = TestHarness::with_files(vec![("/shared.txt", b"original")]);

    let mut a = h.fs.openbin("/shared.txt", "w", None).await.unwrap();
    let mut b = h.fs.openbin("/shared.txt", "w", None).await.unwrap();
    a.write_all(b"from A").unwrap();
    b.write_all(b"from B").unwrap();

    a.close().await.unwrap();
    assert_eq!(h.contents("/shared.txt"), b"from A");
    b.close().await.unwrap();
    assert_eq!(h.contents("/shared.txt"), b"from B");
}

#[tokio::test]
async fn remove_operations_map_to_remote_deletes() {
    let h = TestHarness::with_files(vec![
        ("/a.txt", b"a"),
        ("/empty/.keep", b""),
        ("/tree/sub/b.txt", b"b"),
    ]);

    h.fs.remove("/a.txt").await.unwrap();
    assert!(!h.fs.exists("/a.txt").await.unwrap());

    h.fs.remove("/empty/.keep").await.unwrap();
    h.fs.removedir("/empty").await.unwrap();
    assert!(!h.fs.exists("/empty").await.unwrap());

    h.fs.removetree("/tree").await.unwrap();
    assert!(h.fs.listdir("/").await.unwrap().is_empty());

    let stats = h.remote.stats();
    assert_eq!(stats.delete_file.load(std::sync::atomic::Ordering::SeqCst), 2);
    assert_eq!(stats.delete_folder.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(
        stats
            .delete_folder_recursive
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}

/// Mutation failures pass through as raw remote errors
#[tokio::test]
async fn mutation_errors_are_not_translated() {
    let h = TestHarness::with_files(vec![("/dir/a.txt", b"a")]);

    assert!(matches!(
        h.fs.remove("/missing.txt").await,
        Err(FsError::Remote(RemoteError::NotFound(_)))
    ));
    assert!(matches!(
        h.fs.removedir("/dir").await,
        Err(FsError::Remote(RemoteError::FolderNotEmpty(_)))
    ));
    assert!(matches!(
        h.fs.makedir("/x/y", None, false).await,
        Err(FsError::Remote(RemoteError::NotFound(_)))
    ));
}

#[tokio::test]
async fn makedirs_creates_missing_ancestors() {
    let h = TestHarness::with_files(vec![("/a/keep.txt", b"")]);

    h.fs.makedirs("/a/b/c", None, false).await.unwrap();
    assert!(h.fs.isdir("/a/b").await.unwrap());
    assert!(h.fs.isdir("/a/b/c").await.unwrap());

    h.fs.makedirs("/a/b/c", None, true).await.unwrap();
}

#[tokio::test]
async fn readbytes_requires_existing_file() {
    let h = TestHarness::with_files(vec![("/dir/a.txt", b"a")]);

    assert!(matches!(
        h.fs.readbytes("/dir").await,
        Err(FsError::FileExpected { .. })
    ));
    assert!(matches!(
        h.fs.readbytes("/dir/b.txt").await,
        Err(FsError::ResourceNotFound { .. })
    ));
}

/// Whitespace is part of a name and never collapses onto another entry
#[tokio::test]
async fn names_with_surrounding_spaces_stay_distinct() {
    let h = TestHarness::with_files(vec![("/notes", b"original")]);

    h.fs.writebytes("/notes ", b"spaced").await.unwrap();

    assert_eq!(h.fs.listdir("/").await.unwrap(), vec!["notes", "notes "]);
    assert!(h.fs.exists("/notes ").await.unwrap());
    assert_eq!(h.fs.readbytes("/notes ").await.unwrap(), b"spaced");
    assert_eq!(h.fs.readbytes("/notes").await.unwrap(), b"original");
    assert_eq!(h.contents("/notes"), b"original");
}
