//! sneakerzone-render
//!
//! Catalog sinks that turn the index projection into text cards or JSON.

pub mod card;
pub mod json;

pub use card::CardSink;
pub use json::{CatalogExport, JsonSink};

use sneakerzone_core::IngestionTally;

/// Closing message shown after a folder load.
pub fn summary_line(tally: &IngestionTally) -> String {
    format!("Listo: {} cargados, {} ignorados.", tally.accepted, tally.rejected)
}
