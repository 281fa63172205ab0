//! Random access over sorted, newline-delimited dictionary files.
//!
//! The WordNet distribution keeps every database as a flat text file whose
//! records are lines, sorted by their leading token. This crate abstracts one
//! such file as a [`LineFile`] — a read-only byte view (memory-mapped when
//! possible, an owned buffer otherwise) with line-level primitives — and a
//! process-wide [`FileStore`] that guarantees each distinct file is opened
//! and mapped at most once.
//!
//! Byte offsets are the addressing currency: every record is identified by
//! the offset of its first byte, and the [binary search](LineFile::search_token)
//! works directly on offsets rather than line numbers, which makes a found
//! offset usable for later direct reads.
//!
//! Because the backing view is immutable there is no shared seek position to
//! guard; concurrent readers proceed lock-free, and the only synchronized
//! state is the last line-boundary memo, a pure latency optimization.
//!
//! # Example
//! ```no_run
//! use wordnet_store::{FileStore, LoadMode};
//!
//! # fn main() -> Result<(), wordnet_store::StoreError> {
//! let store = FileStore::new(LoadMode::Mmap);
//! let index = store.open("dict/index.noun")?;
//! let hit = index.search_token("dog")?;
//! if hit >= 0 {
//!     println!("{}", index.line_at(hit as u64)?.unwrap());
//! }
//! # Ok(()) }
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use memmap2::Mmap;
use thiserror::Error;
use tracing::debug;

mod search;

pub use search::{caseless_cmp, exact_cmp, token_has_prefix, token_starts_with};

/// Errors raised while opening or reading a backing file.
///
/// Lookup misses are never errors; they surface as `None` / negative results.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("map {path}: {source}")]
    Map {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: invalid utf-8 in line at byte {offset}")]
    Utf8 { path: PathBuf, offset: u64 },
}

/// Strategy for backing a [`LineFile`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file (fast, zero-copy).
    Mmap,
    /// Read the file into an owned buffer (portable fallback, also the mode
    /// used for data streamed out of an archive).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Process-wide registry of open files.
///
/// Each distinct path is opened at most once; subsequent [`open`](Self::open)
/// calls return the same shared handle. Opening is serialized per path, reads
/// are fully concurrent.
pub struct FileStore {
    mode: LoadMode,
    files: DashMap<PathBuf, Arc<LineFile>>,
}

impl FileStore {
    pub fn new(mode: LoadMode) -> Self {
        Self {
            mode,
            files: DashMap::new(),
        }
    }

    /// Open `path`, or return the already-open handle for it.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Arc<LineFile>, StoreError> {
        let path = path.as_ref();
        match self.files.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let file = Arc::new(LineFile::open(path, self.mode)?);
                debug!(path = %path.display(), len = file.len(), mode = ?self.mode, "opened");
                entry.insert(file.clone());
                Ok(file)
            }
        }
    }

    /// Like [`open`](Self::open), but an absent file is `None` rather than an
    /// error. Side files (`cntlist.rev`, `sents.vrb`, ...) are optional.
    pub fn open_optional(&self, path: impl AsRef<Path>) -> Result<Option<Arc<LineFile>>, StoreError> {
        if !path.as_ref().exists() {
            return Ok(None);
        }
        self.open(path).map(Some)
    }

    /// Number of files currently open.
    pub fn open_count(&self) -> usize {
        self.files.len()
    }
}

/// One flat file viewed as a random-access sequence of newline-delimited
/// records.
///
/// Offsets are byte positions; an offset identifies the record beginning at
/// that byte. Reads at arbitrary mid-line offsets return the remainder of
/// that line, mirroring the raw-file semantics callers rely on.
pub struct LineFile {
    path: PathBuf,
    buf: Buffer,
    // (offset-in, offset-out) of the most recent line-boundary scan.
    memo: Mutex<Option<(u64, u64)>>,
}

impl LineFile {
    fn open(path: &Path, mode: LoadMode) -> Result<Self, StoreError> {
        let file = File::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let buf = match mode {
            LoadMode::Mmap => {
                let map = unsafe { Mmap::map(&file) }.map_err(|source| StoreError::Map {
                    path: path.to_path_buf(),
                    source,
                })?;
                Buffer::Mmap(map)
            }
            LoadMode::Owned => {
                let mut file = file;
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes).map_err(|source| StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Buffer::Owned(bytes)
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            buf,
            memo: Mutex::new(None),
        })
    }

    /// Wrap an in-memory buffer, e.g. a file extracted from an archive.
    pub fn from_bytes(name: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: name.into(),
            buf: Buffer::Owned(bytes),
            memo: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.buf.as_slice().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.buf.as_slice().is_empty()
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// The line beginning at `offset`, without its terminator. `None` once
    /// `offset` is at or past the end of the file.
    pub fn line_at(&self, offset: u64) -> Result<Option<&str>, StoreError> {
        let bytes = self.bytes();
        let start = offset as usize;
        if start >= bytes.len() {
            return Ok(None);
        }
        let end = search::line_end(bytes, start);
        let mut line = &bytes[start..end];
        if line.ends_with(b"\r") {
            line = &line[..line.len() - 1];
        }
        std::str::from_utf8(line)
            .map(Some)
            .map_err(|_| StoreError::Utf8 {
                path: self.path.clone(),
                offset,
            })
    }

    /// Offset of the line following the one at `offset`, or `None` if that
    /// was the last line.
    ///
    /// A one-entry memo short-circuits the immediately preceding lookup; it
    /// only affects latency, never results.
    pub fn next_line_offset(&self, offset: u64) -> Option<u64> {
        {
            let memo = self
                .memo
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some((seen, next)) = *memo
                && seen == offset
            {
                return (next < self.len()).then_some(next);
            }
        }
        let bytes = self.bytes();
        let next = search::skip_line(bytes, offset as usize) as u64;
        *self
            .memo
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some((offset, next));
        (next < self.len()).then_some(next)
    }

    /// The leading token (up to the first space) of the line at `offset`.
    ///
    /// Header lines that start with a space yield an empty token, which sorts
    /// before every real key.
    pub fn line_token(&self, offset: u64) -> Result<Option<&str>, StoreError> {
        let bytes = self.bytes();
        let start = offset as usize;
        if start >= bytes.len() {
            return Ok(None);
        }
        let token = search::token_at(bytes, start);
        std::str::from_utf8(token)
            .map(Some)
            .map_err(|_| StoreError::Utf8 {
                path: self.path.clone(),
                offset,
            })
    }

    /// Treat the file as an array of lines and return the zero-based line
    /// `n`. Intended for the small numeric side files; linear in `n`.
    pub fn read_line_number(&self, n: usize) -> Result<Option<&str>, StoreError> {
        let bytes = self.bytes();
        let mut offset = 0usize;
        for _ in 0..n {
            if offset >= bytes.len() {
                return Ok(None);
            }
            offset = search::skip_line(bytes, offset);
        }
        self.line_at(offset as u64)
    }
}
