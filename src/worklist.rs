//! Pending-work list for the walker
//!
//! A walk keeps its frontier in an intrusive singly linked stack instead of
//! on the call stack, so depth is bounded by the heap rather than by
//! recursion. Each item is a directory entry still being processed; an item
//! stays at the head across its whole lifecycle (visit, descend, pop back
//! out) and is only unlinked once its subtree is done.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One pending entry in a walk.
pub(crate) struct WorkItem {
    /// Logical path of the entry, as reported to callbacks.
    pub(crate) path: PathBuf,
    /// The entry has been visited (callback invoked, children queued).
    pub(crate) visited: bool,
    /// The walker changed into this directory and owes a step back out.
    pub(crate) entered: bool,
    next: Option<Box<WorkItem>>,
}

/// LIFO list of pending entries, most recently discovered first.
pub(crate) struct WorkList {
    head: Option<Box<WorkItem>>,
}

impl WorkList {
    /// Creates a list holding a single unvisited root.
    pub(crate) fn new(root: PathBuf) -> Self {
        let mut list = WorkList { head: None };
        list.push(root);
        list
    }

    pub(crate) fn head_mut(&mut self) -> Option<&mut WorkItem> {
        self.head.as_deref_mut()
    }

    /// Unlinks the head item. No-op on an empty list.
    pub(crate) fn pop(&mut self) {
        if let Some(mut item) = self.head.take() {
            self.head = item.next.take();
        }
    }

    /// Queues the children of `parent` so they come off the list in the
    /// order given. Names are pushed in reverse because the list is LIFO.
    pub(crate) fn push_children(&mut self, parent: &Path, names: Vec<OsString>) {
        for name in names.into_iter().rev() {
            self.push(parent.join(name));
        }
    }

    fn push(&mut self, path: PathBuf) {
        self.head = Some(Box::new(WorkItem {
            path,
            visited: false,
            entered: false,
            next: self.head.take(),
        }));
    }
}

impl Drop for WorkList {
    fn drop(&mut self) {
        // Unlink iteratively. The derived drop would recurse once per item,
        // and abandoning a very deep walk midway would overflow the stack.
        let mut next = self.head.take();
        while let Some(mut item) = next {
            next = item.next.take();
        }
    }
}
