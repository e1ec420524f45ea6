use std::fmt::Debug;

use crate::error::AccessError;
use crate::types::{BucketKey, ProductRecord, SourceRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One child of a directory as reported by a [`FileAccess`] capability.
#[derive(Debug, Clone)]
pub struct Entry<H> {
    pub name: String,
    pub kind: EntryKind,
    pub handle: H,
}

/// Host capability for enumerating directories and exposing file content.
pub trait FileAccess {
    type Handle: Clone + Debug;

    /// Immediate children of `dir`, in whatever order the host reports them.
    fn list_entries(&self, dir: &Self::Handle) -> Result<Vec<Entry<Self::Handle>>, AccessError>;

    /// A reference a renderer can use to show the file.
    fn read_displayable(&self, file: &Self::Handle) -> Result<SourceRef, AccessError>;
}

/// Rendering collaborator fed by `CatalogIndex::project`.
pub trait CatalogSink {
    /// Called once per brand before its first record.
    fn begin_brand(&mut self, _display: &str) {}

    fn receive(&mut self, key: &BucketKey, record: &ProductRecord);

    fn finish(&mut self) {}
}
