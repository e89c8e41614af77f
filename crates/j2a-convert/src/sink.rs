//! Output sinks for converted assets
//!
//! A sink stores named byte streams. Paths are relative and use `/` as the
//! separator, e.g. `Animations/Jazz/idle.aura`. A sink that returns `false`
//! from [`ArchiveSink::add_file`] aborts the conversion.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Destination for converted files
pub trait ArchiveSink {
    /// Store `data` under `path`, returning whether it was accepted
    fn add_file(&mut self, path: &str, data: &[u8]) -> bool;
}

/// Writes files below a root directory, creating directories as needed
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    files_written: usize,
}

impl DirectorySink {
    /// Create a sink rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files_written: 0,
        }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of files written so far
    pub fn files_written(&self) -> usize {
        self.files_written
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut target = self.root.clone();
        for component in path.split('/').filter(|c| !c.is_empty()) {
            if component == "." || component == ".." {
                return None;
            }
            target.push(component);
        }
        (target != self.root).then_some(target)
    }
}

impl ArchiveSink for DirectorySink {
    fn add_file(&mut self, path: &str, data: &[u8]) -> bool {
        let Some(target) = self.resolve(path) else {
            error!("Refusing to write outside of the output directory: {path}");
            return false;
        };

        if let Some(parent) = target.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            error!("Failed to create directory {}: {e}", parent.display());
            return false;
        }

        match fs::write(&target, data) {
            Ok(()) => {
                debug!("Wrote {} ({} bytes)", target.display(), data.len());
                self.files_written += 1;
                true
            }
            Err(e) => {
                error!("Failed to write {}: {e}", target.display());
                false
            }
        }
    }
}

/// Keeps files in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<String, Vec<u8>>,
    capacity: Option<usize>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that rejects every file after the first `capacity`
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            files: BTreeMap::new(),
            capacity: Some(capacity),
        }
    }

    /// Contents stored under `path`
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Stored paths in lexical order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Number of stored files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file was stored
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Consume the sink, returning its files
    pub fn into_files(self) -> BTreeMap<String, Vec<u8>> {
        self.files
    }
}

impl ArchiveSink for MemorySink {
    fn add_file(&mut self, path: &str, data: &[u8]) -> bool {
        if self.capacity.is_some_and(|limit| self.files.len() >= limit) {
            return false;
        }
        self.files.insert(path.to_string(), data.to_vec());
        true
    }
}
