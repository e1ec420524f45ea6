//! In-memory catalog: brand sections holding one bucket per segment.
//!
//! Buckets are stored in an arena and handed out as [`BucketId`]s, so
//! asking for the same `(brand, segment)` twice yields the same id. Each
//! brand has a layout listing the segments its section offers; records for
//! a segment outside the layout go to the brand's `Unisex` bucket when the
//! layout offers one.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::traits::CatalogSink;
use crate::types::{BucketKey, ProductRecord, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketId(usize);

#[derive(Debug, Clone)]
pub struct Bucket {
    key: BucketKey,
    brand_display: String,
    records: VecDeque<ProductRecord>,
}

impl Bucket {
    pub fn key(&self) -> &BucketKey {
        &self.key
    }

    /// Brand as spelled by the first record that created the bucket.
    pub fn brand_display(&self) -> &str {
        &self.brand_display
    }

    pub fn segment(&self) -> Segment {
        self.key.segment
    }

    /// Records, most recently ingested first.
    pub fn records(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone)]
struct BrandSection {
    display: String,
    buckets: BTreeMap<Segment, BucketId>,
}

#[derive(Debug, Clone)]
pub struct CatalogIndex {
    buckets: Vec<Bucket>,
    by_key: HashMap<BucketKey, BucketId>,
    sections: Vec<BrandSection>,
    section_pos: HashMap<String, usize>,
    default_layout: Vec<Segment>,
    layouts: HashMap<String, Vec<Segment>>,
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self::with_default_layout(Segment::ALL.to_vec())
    }
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_layout(layout: Vec<Segment>) -> Self {
        Self {
            buckets: Vec::new(),
            by_key: HashMap::new(),
            sections: Vec::new(),
            section_pos: HashMap::new(),
            default_layout: layout,
            layouts: HashMap::new(),
        }
    }

    /// Restrict (or widen) the segments offered by one brand's section.
    pub fn set_layout(&mut self, brand: &str, layout: Vec<Segment>) {
        self.layouts.insert(brand.to_lowercase(), layout);
    }

    pub fn layout(&self, brand: &str) -> &[Segment] {
        self.layouts
            .get(&brand.to_lowercase())
            .unwrap_or(&self.default_layout)
    }

    /// Bucket for `(brand, segment)`, created empty if missing. Brand
    /// display casing sticks to whatever came first.
    pub fn ensure_bucket(&mut self, brand: &str, segment: Segment) -> BucketId {
        let key = BucketKey::new(brand, segment);
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }

        let pos = match self.section_pos.get(&key.brand).copied() {
            Some(pos) => pos,
            None => {
                self.sections.push(BrandSection { display: brand.to_string(), buckets: BTreeMap::new() });
                let pos = self.sections.len() - 1;
                self.section_pos.insert(key.brand.clone(), pos);
                pos
            }
        };
        let section = &mut self.sections[pos];

        let id = BucketId(self.buckets.len());
        self.buckets.push(Bucket {
            key: key.clone(),
            brand_display: section.display.clone(),
            records: VecDeque::new(),
        });
        section.buckets.insert(segment, id);
        self.by_key.insert(key, id);
        tracing::debug!(bucket = %self.buckets[id.0].key, "created bucket");
        id
    }

    /// Front-insert; newest records come first.
    ///
    /// # Panics
    ///
    /// If `id` was issued by a different index.
    pub fn append(&mut self, id: BucketId, record: ProductRecord) {
        self.buckets[id.0].records.push_front(record);
    }

    /// Where a record for `(brand, segment)` would be filed, without
    /// creating anything.
    ///
    /// The exact bucket wins if it already exists or the brand's layout
    /// offers the segment. A layout offering a segment counts the same as
    /// that bucket existing, so under the default layout every segment is
    /// filed exactly. Otherwise the brand's `Unisex` bucket takes it,
    /// provided it exists or the layout offers it.
    pub fn resolve(&self, brand: &str, segment: Segment) -> Option<BucketKey> {
        let receivable = |seg: Segment| {
            self.by_key.contains_key(&BucketKey::new(brand, seg)) || self.layout(brand).contains(&seg)
        };
        if receivable(segment) {
            Some(BucketKey::new(brand, segment))
        } else if segment != Segment::Unisex && receivable(Segment::Unisex) {
            Some(BucketKey::new(brand, Segment::Unisex))
        } else {
            None
        }
    }

    /// [`resolve`](Self::resolve) and create the resulting bucket on demand.
    pub fn lookup_or_fallback(&mut self, brand: &str, segment: Segment) -> Option<BucketId> {
        let key = self.resolve(brand, segment)?;
        Some(self.ensure_bucket(brand, key.segment))
    }

    /// `None` for an id issued by a different index.
    pub fn bucket(&self, id: BucketId) -> Option<&Bucket> {
        self.buckets.get(id.0)
    }

    pub fn get(&self, key: &BucketKey) -> Option<&Bucket> {
        self.by_key.get(key).map(|&id| &self.buckets[id.0])
    }

    /// Brand display names in first-seen order.
    pub fn brands(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.display.as_str())
    }

    /// Buckets grouped by brand (first-seen order), segments in
    /// [`Segment::ALL`] order within a brand.
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> {
        self.sections
            .iter()
            .flat_map(|s| s.buckets.values().map(|&id| &self.buckets[id.0]))
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    /// Feed every record to `sink`, brand by brand.
    pub fn project(&self, sink: &mut dyn CatalogSink) {
        for section in &self.sections {
            sink.begin_brand(&section.display);
            for &id in section.buckets.values() {
                let bucket = &self.buckets[id.0];
                for record in &bucket.records {
                    sink.receive(&bucket.key, record);
                }
            }
        }
        sink.finish();
    }
}
