//! Lazy depth-first traversal over a [`FileAccess`] capability.

use std::vec;

use thiserror::Error;

use sneakerzone_core::error::AccessError;
use sneakerzone_core::traits::{Entry, EntryKind, FileAccess};

/// A file reached by the walk.
#[derive(Debug, Clone)]
pub struct FileEntry<H> {
    pub name: String,
    pub handle: H,
}

#[derive(Debug, Error)]
pub enum WalkError {
    /// A subdirectory could not be listed; its contents are left out and the
    /// walk goes on.
    #[error("skipped directory '{dir}': {source}")]
    Skipped {
        dir: String,
        #[source]
        source: AccessError,
    },

    /// The host failed in a way that ends the walk.
    #[error("directory '{dir}' failed: {source}")]
    Fault {
        dir: String,
        #[source]
        source: AccessError,
    },
}

pub struct TreeWalker<'a, A: FileAccess + ?Sized> {
    access: &'a A,
    pending: Vec<vec::IntoIter<Entry<A::Handle>>>,
}

impl<'a, A: FileAccess + ?Sized> TreeWalker<'a, A> {
    /// Lists `root` right away so access problems surface before any entry
    /// is produced.
    pub fn new(access: &'a A, root: &A::Handle) -> Result<Self, AccessError> {
        let top = access.list_entries(root)?;
        Ok(Self { access, pending: vec![top.into_iter()] })
    }
}

impl<A: FileAccess + ?Sized> Iterator for TreeWalker<'_, A> {
    type Item = Result<FileEntry<A::Handle>, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.pending.last_mut()?;
            let Some(entry) = level.next() else {
                self.pending.pop();
                continue;
            };
            match entry.kind {
                EntryKind::File => {
                    return Some(Ok(FileEntry { name: entry.name, handle: entry.handle }));
                }
                EntryKind::Directory => match self.access.list_entries(&entry.handle) {
                    Ok(children) => self.pending.push(children.into_iter()),
                    Err(source) if source.is_recoverable() => {
                        return Some(Err(WalkError::Skipped { dir: entry.name, source }));
                    }
                    Err(source) => {
                        self.pending.clear();
                        return Some(Err(WalkError::Fault { dir: entry.name, source }));
                    }
                },
            }
        }
    }
}
