//! Test utilities for building directory trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree for testing.
///
/// Provides methods for creating files, subdirectories, and nesting chains
/// deeper than `PATH_MAX`. The tree is automatically cleaned up when
/// dropped.
pub struct TreeFixture {
    dir: TempDir,
}

impl TreeFixture {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file with the given content.
    ///
    /// Creates parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add an empty directory, creating parents as needed.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Add a chain of `depth` nested directories, each named `name`,
    /// and return the path of the chain's first segment.
    ///
    /// The chain is built by stepping into each segment in turn, because a
    /// deep enough chain's absolute paths exceed `PATH_MAX` and cannot be
    /// created directly. The process working directory moves during the
    /// build and is put back before returning; the walk lock is held
    /// throughout so no walk sees the intermediate states.
    pub fn add_deep_chain(&self, name: &str, depth: usize) -> PathBuf {
        let _walk = crate::walker::walk_lock();
        let saved = env::current_dir().expect("Failed to read working dir");
        env::set_current_dir(self.dir.path()).expect("Failed to enter temp dir");
        for _ in 0..depth {
            fs::create_dir(name).expect("Failed to create chain segment");
            env::set_current_dir(name).expect("Failed to enter chain segment");
        }
        env::set_current_dir(&saved).expect("Failed to restore working dir");
        self.dir.path().join(name)
    }
}

impl Default for TreeFixture {
    fn default() -> Self {
        Self::new()
    }
}
