use std::fmt::Write as _;

use sneakerzone_core::traits::CatalogSink;
use sneakerzone_core::{BucketKey, ProductRecord, Segment};

/// Plain-text product cards grouped under brand and segment headings.
#[derive(Debug, Default)]
pub struct CardSink {
    out: String,
    current: Option<BucketKey>,
}

impl CardSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn segment_heading(&mut self, segment: Segment) {
        let _ = writeln!(self.out, "\n  -- {segment} --");
    }
}

impl CatalogSink for CardSink {
    fn begin_brand(&mut self, display: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        let _ = writeln!(self.out, "== {display} ==");
        self.current = None;
    }

    fn receive(&mut self, key: &BucketKey, record: &ProductRecord) {
        if self.current.as_ref() != Some(key) {
            self.segment_heading(key.segment);
            self.current = Some(key.clone());
        }
        self.out.push_str(&render_card(record));
    }
}

/// One card: model, meta line, price, size buttons, image reference.
pub fn render_card(record: &ProductRecord) -> String {
    let name = &record.name;
    let sizes: Vec<String> = name.sizes.iter().map(|s| format!("[{s}]")).collect();
    format!(
        "  {}\n    {} • {} • {}\n    {}\n    {}\n    {}\n",
        name.model,
        name.brand,
        name.segment,
        name.color,
        format_price(name.price),
        sizes.join(" "),
        record.source,
    )
}

pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}
