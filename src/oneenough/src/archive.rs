//! ZIP archive traversal.
//!
//! Mod archives are plain ZIP containers (`.jar`/`.zip`). The reader keeps the
//! file handle open for a single traversal only and decompresses entry bytes
//! only when the caller asks for them, so large archives with mostly
//! irrelevant entries stay cheap to scan.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("corrupt archive: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ZipError> for ArchiveError {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::Io(io) => ArchiveError::Io(io),
            other => ArchiveError::Corrupt(other.to_string()),
        }
    }
}

/// Reader for a single mod archive.
pub struct ArchiveReader {
    path: PathBuf,
}

impl ArchiveReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ArchiveReader { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Walk every file entry in the archive.
    ///
    /// `wants_content` decides from the entry path whether the entry bytes
    /// should be decompressed; entries it rejects are visited with `None`.
    /// Directory entries are skipped. Each call opens the archive fresh and
    /// drops the handle when the traversal ends.
    pub fn for_each_entry<P, F>(&self, wants_content: P, mut visit: F) -> Result<(), ArchiveError>
    where
        P: Fn(&str) -> bool,
        F: FnMut(&str, Option<&[u8]>),
    {
        let file = File::open(&self.path)?;
        let mut archive = ZipArchive::new(file)?;

        let mut buf = Vec::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }

            let name = entry.name().to_string();
            if wants_content(&name) {
                buf.clear();
                // A single unreadable entry does not poison the archive
                if entry.read_to_end(&mut buf).is_err() {
                    continue;
                }
                visit(&name, Some(&buf));
            } else {
                visit(&name, None);
            }
        }

        Ok(())
    }
}
