//! Depth-first directory walking without recursion
//!
//! The walker never builds a path longer than one component. It changes the
//! process working directory into each directory it descends into, examines
//! and lists entries by bare name, and steps back out with `..` when a
//! subtree is done. Depth is therefore not limited by `PATH_MAX`, and memory
//! is bounded by the frontier of the walk rather than by its depth.
//!
//! The cost of the trick is that the working directory is process-wide
//! state: walks are serialized behind a lock, and nothing else in the
//! process should depend on the working directory while one runs.

use std::env;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace, warn};

use crate::error::{Result, WalkError};
use crate::worklist::WorkList;

static WALK_LOCK: Mutex<()> = Mutex::new(());

/// Takes the process-wide walk lock. The working directory is shared
/// mutable state, so only one walk may be moving it at a time.
pub(crate) fn walk_lock() -> MutexGuard<'static, ()> {
    WALK_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Status function used on each entry, swappable in tests.
pub(crate) type StatFn = fn(&Path) -> io::Result<Metadata>;

fn lstat(path: &Path) -> io::Result<Metadata> {
    fs::symlink_metadata(path)
}

/// Walks the tree rooted at `root` depth first, calling `walk_fn` for every
/// entry in preorder: each directory is reported before its contents.
/// Symlinks are reported but never followed.
///
/// The callback receives the entry's logical path (the root as given, plus
/// the names discovered below it), its metadata, and optionally the error
/// encountered handling it. On a failure the metadata may be absent; the
/// walk goes on with the entry's siblings either way. The callback can
/// return [`WalkError::SkipDir`] for a directory to prune that subtree.
///
/// Any other error the callback returns is recorded and the walk moves on;
/// `walk` returns the error from the most recent callback invocation that
/// produced one, or `Ok(())` if the final verdicts were all clean. The one
/// non-recoverable failure is being unable to step back out of a directory,
/// which aborts the walk immediately.
///
/// The process working directory moves during the walk and is restored on
/// return. Concurrent walks are serialized internally.
pub fn walk<P, F>(root: P, walk_fn: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(&Path, Option<&Metadata>, Option<io::Error>) -> Result<()>,
{
    walk_with_stat(root.as_ref(), lstat, walk_fn)
}

pub(crate) fn walk_with_stat<F>(root: &Path, stat: StatFn, mut walk_fn: F) -> Result<()>
where
    F: FnMut(&Path, Option<&Metadata>, Option<io::Error>) -> Result<()>,
{
    let _walk = walk_lock();
    let _restore = RestoreCwd::capture()?;

    // Resolve everything else relative to the root's parent, so the root
    // itself can be handled by base name like any other entry.
    if let Err(err) = env::set_current_dir(parent_of(root)) {
        return walk_fn(root, None, Some(err));
    }

    let mut list = WorkList::new(root.to_path_buf());
    drive(&mut list, stat, &mut walk_fn)
}

/// Drains the work list, visiting entries and descending into directories.
///
/// The head item tracks where the walk is: an unvisited head gets visited
/// (and, for a directory, entered and its children stacked on top), and a
/// visited head is done and gets popped, stepping back out of it first if
/// it was entered.
fn drive<F>(list: &mut WorkList, stat: StatFn, walk_fn: &mut F) -> Result<()>
where
    F: FnMut(&Path, Option<&Metadata>, Option<io::Error>) -> Result<()>,
{
    let mut last_error: Option<WalkError> = None;

    loop {
        let Some(item) = list.head_mut() else {
            return match last_error {
                Some(err) => Err(err),
                None => Ok(()),
            };
        };

        if item.visited {
            if item.entered {
                let dir = item.path.clone();
                leave_dir(&dir)?;
            }
            list.pop();
            continue;
        }

        item.visited = true;
        let path = item.path.clone();
        trace!("visit {}", path.display());

        let meta = match stat(base_name(&path)) {
            Ok(meta) => meta,
            Err(err) => {
                warn!("can't stat {}: {}", path.display(), err);
                last_error = walk_fn(&path, None, Some(err)).err();
                continue;
            }
        };

        match walk_fn(&path, Some(&meta), None) {
            Ok(()) => {}
            Err(WalkError::SkipDir) if meta.is_dir() => continue,
            Err(err) => {
                last_error = Some(err);
                continue;
            }
        }

        if !meta.is_dir() {
            continue;
        }

        if let Err(err) = env::set_current_dir(base_name(&path)) {
            warn!("can't enter {}: {}", path.display(), err);
            last_error = walk_fn(&path, Some(&meta), Some(err)).err();
            continue;
        }
        item.entered = true;
        debug!("entered {}", path.display());

        let mut names = Vec::new();
        match fs::read_dir(".") {
            Ok(entries) => {
                for entry in entries {
                    match entry {
                        Ok(entry) => names.push(entry.file_name()),
                        Err(err) => {
                            // Keep whatever was listed before the failure.
                            warn!("listing {} failed: {}", path.display(), err);
                            last_error = walk_fn(&path, Some(&meta), Some(err)).err();
                            break;
                        }
                    }
                }
            }
            Err(err) => {
                warn!("can't list {}: {}", path.display(), err);
                last_error = walk_fn(&path, Some(&meta), Some(err)).err();
                continue;
            }
        }
        list.push_children(&path, names);
    }
}

/// Steps back out of `path` to its parent.
///
/// A failure here is fatal to the walk: with the process stranded in the
/// wrong directory, every name still queued would resolve against the
/// wrong place.
fn leave_dir(path: &Path) -> Result<()> {
    match env::set_current_dir("..") {
        Ok(()) => {
            debug!("left {}", path.display());
            Ok(())
        }
        Err(source) => {
            let cwd = match env::current_dir() {
                Ok(dir) => dir.display().to_string(),
                Err(err) => format!("unknown ({err})"),
            };
            Err(WalkError::LeaveDir {
                path: path.to_path_buf(),
                cwd,
                source,
            })
        }
    }
}

/// Final component of `path`, the name it goes by inside its parent.
fn base_name(path: &Path) -> &Path {
    match path.file_name() {
        Some(name) => Path::new(name),
        None if path.as_os_str().is_empty() => Path::new("."),
        None => path,
    }
}

/// Directory containing `path`, with `.` standing in for an empty parent.
fn parent_of(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None if path.as_os_str().is_empty() => Path::new("."),
        None => path,
    }
}

/// Puts the working directory back where the walk found it, best effort.
struct RestoreCwd {
    saved: PathBuf,
}

impl RestoreCwd {
    fn capture() -> io::Result<Self> {
        Ok(RestoreCwd {
            saved: env::current_dir()?,
        })
    }
}

impl Drop for RestoreCwd {
    fn drop(&mut self) {
        if let Err(err) = env::set_current_dir(&self.saved) {
            warn!("can't restore working directory {}: {}", self.saved.display(), err);
        }
    }
}
