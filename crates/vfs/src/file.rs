//! Buffered remote file
//!
//! pCloud only moves whole objects, so a `RemoteFile` downloads the full
//! object when opened, serves every read, write and seek from memory, and
//! uploads the full buffer again when closed (only if opened for writing).
//!
//! There is no locking: two handles writing the same path each upload
//! their own buffer on close, and the last close wins.

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use pcloudfs_remote::{RemoteError, RemoteStorage, UploadOptions};
use tracing::{debug, warn};

use crate::error::{FsError, FsResult};
use crate::filesystem::FsFile;
use crate::mode::Mode;

/// Outcome of the download performed when a file is opened
#[derive(Debug)]
pub enum InitialContent {
    /// The object exists and its full content was fetched
    Loaded(Vec<u8>),
    /// The object does not exist (yet)
    Absent,
    /// The object could not be fetched for another reason
    Unreachable(RemoteError),
}

impl InitialContent {
    async fn fetch(remote: &dyn RemoteStorage, path: &str) -> Self {
        match remote.download_file(path).await {
            Ok(data) => Self::Loaded(data),
            Err(e) if e.is_not_found() => Self::Absent,
            Err(e) => Self::Unreachable(e),
        }
    }
}

struct OpenFile {
    remote: Arc<dyn RemoteStorage>,
    path: String,
    mode: Mode,
    buffer: Cursor<Vec<u8>>,
}

enum FileState {
    Open(OpenFile),
    Closed,
}

/// In-memory, seekable stand-in for one remote object
pub struct RemoteFile {
    state: FileState,
}

impl RemoteFile {
    /// Open `path`, seeding the buffer from the remote object when the mode keeps content
    ///
    /// A failed download never fails the open: the handle starts empty,
    /// which is what makes writing a brand-new path possible.
    pub async fn open(remote: Arc<dyn RemoteStorage>, path: impl Into<String>, mode: Mode) -> Self {
        let path = path.into();
        let keeps_content = (mode.reading() && !mode.truncate()) || mode.appending();

        let seed = match InitialContent::fetch(remote.as_ref(), &path).await {
            InitialContent::Loaded(data) if keeps_content => Some(data),
            InitialContent::Loaded(_) => None,
            InitialContent::Absent => {
                debug!(path = %path, "Remote object absent, starting empty");
                None
            }
            InitialContent::Unreachable(e) => {
                warn!(path = %path, error = %e, "Initial download failed, starting empty");
                None
            }
        };

        let seeded = seed.is_some();
        let mut buffer = Cursor::new(seed.unwrap_or_default());
        if mode.appending() && seeded {
            buffer.set_position(buffer.get_ref().len() as u64);
        }

        debug!(path = %path, mode = %mode, bytes = buffer.get_ref().len(), "Opened remote file");

        Self {
            state: FileState::Open(OpenFile {
                remote,
                path,
                mode,
                buffer,
            }),
        }
    }

    pub const fn is_closed(&self) -> bool {
        matches!(self.state, FileState::Closed)
    }

    /// Current content of the buffer
    pub fn getvalue(&self) -> FsResult<&[u8]> {
        match &self.state {
            FileState::Open(open) => Ok(open.buffer.get_ref()),
            FileState::Closed => Err(FsError::FileClosed),
        }
    }

    /// Upload the buffer if the file was opened for writing, then release the handle
    ///
    /// The handle is closed afterwards even when the upload fails; the
    /// upload error is returned to the caller.
    pub async fn close(&mut self) -> FsResult<()> {
        let open = match std::mem::replace(&mut self.state, FileState::Closed) {
            FileState::Open(open) => open,
            FileState::Closed => return Err(FsError::FileClosed),
        };

        if !open.mode.writing() {
            return Ok(());
        }

        let data = open.buffer.into_inner();
        let bytes = data.len();
        let options = UploadOptions::overwrite().modified_at(Utc::now());
        open.remote.upload_file(data, &open.path, &options).await?;

        debug!(path = %open.path, bytes, "Uploaded remote file");
        Ok(())
    }

    fn open_mut(&mut self) -> io::Result<&mut OpenFile> {
        match &mut self.state {
            FileState::Open(open) => Ok(open),
            FileState::Closed => Err(closed_error()),
        }
    }
}

fn closed_error() -> io::Error {
    io::Error::other("I/O operation on closed file")
}

impl Read for RemoteFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let open = self.open_mut()?;
        if !open.mode.reading() {
            return Err(io::Error::other("File not open for reading"));
        }
        open.buffer.read(buf)
    }
}

impl Write for RemoteFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let open = self.open_mut()?;
        if !open.mode.writing() {
            return Err(io::Error::other("File not open for writing"));
        }
        if open.mode.appending() {
            open.buffer.seek(SeekFrom::End(0))?;
        }
        open.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.open_mut().map(|_| ())
    }
}

impl Seek for RemoteFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.open_mut()?.buffer.seek(pos)
    }
}

#[async_trait]
impl FsFile for RemoteFile {
    fn path(&self) -> Option<&str> {
        match &self.state {
            FileState::Open(open) => Some(&open.path),
            FileState::Closed => None,
        }
    }

    fn mode(&self) -> Option<&Mode> {
        match &self.state {
            FileState::Open(open) => Some(&open.mode),
            FileState::Closed => None,
        }
    }

    fn is_closed(&self) -> bool {
        Self::is_closed(self)
    }

    async fn close(&mut self) -> FsResult<()> {
        Self::close(self).await
    }
}

impl Drop for RemoteFile {
    fn drop(&mut self) {
        if let FileState::Open(open) = &self.state {
            if open.mode.writing() {
                warn!(path = %open.path, "Writable remote file dropped without close; changes discarded");
            }
        }
    }
}
