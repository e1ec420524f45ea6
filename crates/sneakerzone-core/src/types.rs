//! Domain types shared by the parser, the index and the ingest pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target demographic of a product.
///
/// Filenames spell segments in Spanish (`Hombre`, `Mujer`, `Unisex`); the
/// canonical label is what gets stored, serialized and displayed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    #[serde(rename = "Hombre", alias = "hombre", alias = "men")]
    Men,
    #[serde(rename = "Mujer", alias = "mujer", alias = "women")]
    Women,
    #[serde(rename = "Unisex", alias = "unisex")]
    Unisex,
}

impl Segment {
    /// Catalog display order, same as the sections of a brand.
    pub const ALL: [Segment; 3] = [Segment::Men, Segment::Women, Segment::Unisex];

    pub fn label(self) -> &'static str {
        match self {
            Segment::Men => "Hombre",
            Segment::Women => "Mujer",
            Segment::Unisex => "Unisex",
        }
    }

    /// Case-insensitive match against the filename labels.
    pub fn parse_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|seg| seg.label().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque handle that lets a renderer fetch the image later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields decoded from a product filename.
///
/// Only `filename::parse` builds these, so every value here went through
/// the full grammar.
///
/// - `brand`: alphabetic, casing as captured
/// - `segment`: normalized demographic
/// - `model`/`color`: free text without `_`
/// - `price`: non-negative decimal
/// - `sizes`: raw size tokens in filename order, duplicates kept
#[derive(Debug, Clone, Serialize, PartialEq)]
#[non_exhaustive]
pub struct ProductName {
    pub brand: String,
    pub segment: Segment,
    pub model: String,
    pub color: String,
    pub price: f64,
    pub sizes: Vec<String>,
}

impl ProductName {
    pub(crate) fn new(
        brand: String,
        segment: Segment,
        model: String,
        color: String,
        price: f64,
        sizes: Vec<String>,
    ) -> Self {
        Self { brand, segment, model, color, price, sizes }
    }
}

/// A parsed product bound to the file it came from.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[non_exhaustive]
pub struct ProductRecord {
    #[serde(flatten)]
    pub name: ProductName,
    pub source: SourceRef,
}

impl ProductRecord {
    pub fn new(name: ProductName, source: SourceRef) -> Self {
        Self { name, source }
    }
}

/// Lookup key of a bucket: lowercase brand plus segment.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    pub brand: String,
    pub segment: Segment,
}

impl BucketKey {
    pub fn new(brand: &str, segment: Segment) -> Self {
        Self { brand: brand.to_lowercase(), segment }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.brand, self.segment)
    }
}

/// Counters for one ingest run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestionTally {
    pub accepted: usize,
    pub rejected: usize,
}

impl IngestionTally {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}
