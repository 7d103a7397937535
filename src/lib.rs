//! deepwalk - walk directory trees of unbounded depth
//!
//! Recursive tree walkers carry two hidden limits: call-stack depth and
//! `PATH_MAX`. deepwalk has neither. It drives the walk from an explicit
//! work list instead of the call stack, and it changes the process working
//! directory as it descends so every filesystem call uses a single bare
//! name. Trees nested far deeper than `PATH_MAX` walk fine.
//!
//! Entries are reported in depth-first preorder through a callback, which
//! also hears about entries that could not be examined, entered, or listed,
//! and can prune directories with [`WalkError::SkipDir`].
//!
//! ```no_run
//! use deepwalk::walk;
//!
//! # fn main() -> Result<(), deepwalk::WalkError> {
//! walk("some/dir", |path, _meta, err| {
//!     match err {
//!         Some(err) => eprintln!("{}: {}", path.display(), err),
//!         None => println!("{}", path.display()),
//!     }
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! Because the working directory is process-wide state, walks are
//! serialized behind an internal lock and the working directory is restored
//! when each walk returns. Code running concurrently with a walk must not
//! rely on the working directory staying put.

pub mod error;
#[cfg(feature = "test-utils")]
pub mod test_utils;
mod walker;
mod worklist;

pub use error::{Result, WalkError};
pub use walker::walk;
