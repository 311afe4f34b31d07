//! readers for the kernel's virtual files.
//!
//! every reader takes a [`Procfs`] so that the same parsing code runs against
//! a mounted procfs, an alternate root, or an in-memory fixture.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fs::{self, File};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use tracing::trace;

use self::line::{DEFAULT_MAX_LEN, LineReader};

pub mod cpuinfo;
pub mod kernel;
pub mod line;
pub mod loadavg;
pub mod meminfo;
pub mod status;
pub mod tokenize;
pub mod uptime;

/// Errors raised while reading a virtual file.
#[derive(Debug, thiserror::Error)]
pub enum ProcfsError {
    /// The file could not be opened, so the metric it backs has no data.
    #[error("{path} is unavailable: {source}")]
    DataUnavailable { path: String, source: io::Error },

    /// The file opened but reading it failed part way through.
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: io::Error },

    /// The file was read but did not contain what the reader expected.
    #[error("malformed {path}: {detail}")]
    Malformed { path: String, detail: String },

    /// The configured root exists but is not a directory.
    #[error("procfs root {path} is not a directory")]
    NotADirectory { path: String },
}

/// A tree of kernel virtual files, addressed by paths relative to its root.
pub trait Procfs {
    type Reader: Read;

    /// Opens the file at `path`, e.g. `"uptime"` or `"42/status"`.
    fn open(&self, path: &str) -> io::Result<Self::Reader>;

    /// Names of the entries directly under the root.
    fn entries(&self) -> io::Result<Vec<String>>;

    /// Longest record a reader will take from one line.
    fn max_line_len(&self) -> usize {
        DEFAULT_MAX_LEN
    }
}

/// A procfs mounted (or copied) at a directory on disk.
#[derive(Clone, Debug)]
pub struct ProcRoot {
    root: PathBuf,
    max_line_len: usize,
}

/// An in-memory procfs for tests and benchmarks.
///
/// each path holds a queue of contents; every open pops the front, except the
/// last entry which stays in place. this lets a test script how a counter such
/// as `uptime` advances between two reads.
#[derive(Debug, Default)]
pub struct MockProcfs {
    files: RefCell<BTreeMap<String, VecDeque<String>>>,
}

// === impl ProcRoot ===

impl ProcRoot {
    pub const DEFAULT: &str = "/proc";

    /// Opens `root`, failing if it is missing or not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ProcfsError> {
        let root = root.into();
        let metadata = fs::metadata(&root).map_err(|source| ProcfsError::DataUnavailable {
            path: root.display().to_string(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(ProcfsError::NotADirectory {
                path: root.display().to_string(),
            });
        }
        Ok(Self {
            root,
            max_line_len: DEFAULT_MAX_LEN,
        })
    }

    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Procfs for ProcRoot {
    type Reader = File;

    fn open(&self, path: &str) -> io::Result<File> {
        File::open(self.root.join(path))
    }

    fn entries(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            if let Some(name) = entry?.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn max_line_len(&self) -> usize {
        self.max_line_len
    }
}

// === impl MockProcfs ===

impl MockProcfs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file whose contents never change.
    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.with_sequence(path, [contents])
    }

    /// Adds a file whose contents change on each open.
    pub fn with_sequence<'a>(
        self,
        path: &str,
        contents: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.files.borrow_mut().insert(
            path.to_string(),
            contents.into_iter().map(str::to_string).collect(),
        );
        self
    }
}

impl Procfs for MockProcfs {
    type Reader = Cursor<Vec<u8>>;

    fn open(&self, path: &str) -> io::Result<Cursor<Vec<u8>>> {
        let mut files = self.files.borrow_mut();
        let queue = files
            .get_mut(path)
            .filter(|queue| !queue.is_empty())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))?;
        let contents = if queue.len() > 1 {
            queue.pop_front().unwrap_or_default()
        } else {
            queue.front().cloned().unwrap_or_default()
        };
        Ok(Cursor::new(contents.into_bytes()))
    }

    fn entries(&self) -> io::Result<Vec<String>> {
        let files = self.files.borrow();
        let names: BTreeSet<&str> = files
            .keys()
            .filter_map(|path| path.split('/').next())
            .collect();
        Ok(names.into_iter().map(str::to_string).collect())
    }
}

/// Opens `path` and iterates its records, tagging failures with the path.
pub fn records<P: Procfs + ?Sized>(
    procfs: &P,
    path: &str,
) -> Result<impl Iterator<Item = Result<String, ProcfsError>> + use<P>, ProcfsError> {
    let reader = procfs
        .open(path)
        .map_err(|source| ProcfsError::DataUnavailable {
            path: path.to_string(),
            source,
        })?;
    let path = path.to_string();
    Ok(LineReader::with_max_len(reader, procfs.max_line_len())
        .records()
        .map(move |record| {
            record.map_err(|source| ProcfsError::Io {
                path: path.clone(),
                source,
            })
        }))
}

/// Reads the first record of a single-line file such as `uptime`.
pub fn first_record<P: Procfs + ?Sized>(procfs: &P, path: &str) -> Result<String, ProcfsError> {
    records(procfs, path)?
        .next()
        .transpose()?
        .ok_or_else(|| ProcfsError::Malformed {
            path: path.to_string(),
            detail: "file is empty".to_string(),
        })
}

/// Process identifiers under the root, in ascending order.
///
/// only entries whose names are entirely ascii digits count; everything else
/// in the root (`self`, `sys`, `meminfo`, ...) is ignored.
pub fn pids<P: Procfs + ?Sized>(procfs: &P) -> Result<Vec<u32>, ProcfsError> {
    let entries = procfs
        .entries()
        .map_err(|source| ProcfsError::DataUnavailable {
            path: ".".to_string(),
            source,
        })?;
    let mut pids: Vec<u32> = entries
        .iter()
        .filter(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|name| match name.parse() {
            Ok(pid) => Some(pid),
            Err(_) => {
                trace!(name = %name, "skipping numeric entry that does not fit a pid");
                None
            }
        })
        .collect();
    pids.sort_unstable();
    Ok(pids)
}
