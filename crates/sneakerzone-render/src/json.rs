use std::io::Write;

use serde::Serialize;

use sneakerzone_core::traits::CatalogSink;
use sneakerzone_core::{BucketKey, ProductRecord, Segment};

#[derive(Debug, Default, Serialize)]
pub struct CatalogExport {
    pub brands: Vec<BrandExport>,
}

#[derive(Debug, Serialize)]
pub struct BrandExport {
    pub brand: String,
    pub segments: Vec<SegmentExport>,
}

#[derive(Debug, Serialize)]
pub struct SegmentExport {
    pub segment: Segment,
    pub products: Vec<ProductRecord>,
}

/// Collects the projection into a serializable tree.
#[derive(Debug, Default)]
pub struct JsonSink {
    export: CatalogExport,
}

impl JsonSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_to<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(writer, &self.export)?;
        Ok(())
    }
}

impl CatalogSink for JsonSink {
    fn begin_brand(&mut self, display: &str) {
        self.export.brands.push(BrandExport { brand: display.to_string(), segments: Vec::new() });
    }

    fn receive(&mut self, key: &BucketKey, record: &ProductRecord) {
        let Some(brand) = self.export.brands.last_mut() else { return };
        if brand.segments.last().map(|s| s.segment) != Some(key.segment) {
            brand.segments.push(SegmentExport { segment: key.segment, products: Vec::new() });
        }
        if let Some(seg) = brand.segments.last_mut() {
            seg.products.push(record.clone());
        }
    }
}
