//! Project Storage
//!
//! File access rooted at the open project's directory. Asset definitions
//! reference payload files by project-relative path; everything that loads
//! one goes through this capability rather than touching the filesystem
//! directly, so tests can point it at a temporary directory.

#![allow(dead_code)]

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for storage operations
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// File not found at the resolved path
    NotFound(String),
    /// Any other I/O failure
    Io(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(path) => write!(f, "not found: {}", path),
            StorageError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// File access rooted at a project directory.
#[derive(Debug, Clone)]
pub struct Storage {
    base_dir: PathBuf,
}

impl Storage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The project directory this storage is rooted at
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a project-relative path to an absolute one
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Check whether a project-relative path exists
    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    /// Read a file as raw bytes
    pub fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path);
        if !full.exists() {
            return Err(StorageError::NotFound(path.to_string()));
        }
        fs::read(&full).map_err(|e| StorageError::Io(e.to_string()))
    }

    /// Read a file as UTF-8 text
    pub fn read_to_string(&self, path: &str) -> Result<String, StorageError> {
        let full = self.resolve(path);
        if !full.exists() {
            return Err(StorageError::NotFound(path.to_string()));
        }
        fs::read_to_string(&full).map_err(|e| StorageError::Io(e.to_string()))
    }

    /// Write a file, creating parent directories as needed
    pub fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        fs::write(&full, bytes).map_err(|e| StorageError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        match storage.read("nope.bin") {
            Err(StorageError::NotFound(p)) => assert_eq!(p, "nope.bin"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn write_then_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("assets/data.txt", b"payload").unwrap();
        assert!(storage.exists("assets/data.txt"));
        assert_eq!(storage.read_to_string("assets/data.txt").unwrap(), "payload");
    }
}
