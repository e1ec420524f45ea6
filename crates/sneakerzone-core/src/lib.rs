//! sneakerzone-core
//!
//! Product filenames, the brand/segment catalog index, and the traits the
//! ingest pipeline and renderers plug into.

pub mod config;
pub mod error;
pub mod filename;
pub mod index;
pub mod traits;
pub mod types;

pub use index::{Bucket, BucketId, CatalogIndex};
pub use types::{BucketKey, IngestionTally, ProductName, ProductRecord, Segment, SourceRef};
