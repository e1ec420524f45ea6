//! sneakerzone-ingest
//!
//! Folder ingestion: a depth-first walker over a file-access capability, a
//! local-filesystem capability built on `walkdir`, an in-memory one, and the
//! coordinator that files each product image into a `CatalogIndex`.

pub mod coordinator;
pub mod fs_access;
pub mod memory;
pub mod walker;

pub use coordinator::{
    ingest, AbortReason, EntryOutcome, IngestError, IngestObserver, Ingestor, RejectReason, StopSignal,
};
pub use fs_access::FsAccess;
pub use memory::{MemoryAccess, NodeId};
pub use walker::{FileEntry, TreeWalker, WalkError};
