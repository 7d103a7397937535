//! Error types for deepwalk

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for walk operations.
pub type Result<T> = std::result::Result<T, WalkError>;

/// Errors surfaced by a walk, and the values a walk callback may return.
///
/// `SkipDir` doubles as the "do not descend" signal: a callback returns it
/// for a directory to prune that subtree without the walk treating it as a
/// failure. Returned for anything other than a directory it is an ordinary
/// error and is recorded like any other.
#[derive(Debug, Error)]
pub enum WalkError {
    /// Skip the directory currently being visited.
    #[error("skip this directory")]
    SkipDir,

    /// An I/O failure, either surfaced by the walker or returned from a
    /// callback.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The walker entered a directory and could not change back out of it.
    ///
    /// This is the one failure that aborts a walk outright: once a `chdir`
    /// back to the parent fails, every queued path would resolve against the
    /// wrong directory. The message carries the best-effort working
    /// directory at the time of the failure (or the reason it could not be
    /// determined).
    #[error("can't step back out of {}: {} (working directory: {})", .path.display(), .source, .cwd)]
    LeaveDir {
        /// Logical path of the directory that could not be left.
        path: PathBuf,
        /// Where the process believes it is, best effort.
        cwd: String,
        #[source]
        source: io::Error,
    },

    /// A caller-supplied failure with no underlying I/O error.
    #[error("{0}")]
    Other(String),
}
