//! Product filename grammar.
//!
//! `Brand_Segment_Model_Color_Price_Sizes.Extension`, for example
//! `Skechers_Mujer_DLux_Rosa_530_23.5-24-25.jpg`. The whole name has to
//! match; nothing is salvaged from a partial match.

use thiserror::Error;

use crate::types::{ProductName, Segment};

/// Accepted image extensions, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

const FIELD_SEPARATOR: char = '_';
const SIZE_SEPARATOR: char = '-';

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("no extension")]
    MissingExtension,
    #[error("unsupported extension '{0}'")]
    UnsupportedExtension(String),
    #[error("expected 6 fields, found {0}")]
    FieldCount(usize),
    #[error("brand '{0}' is not purely alphabetic")]
    InvalidBrand(String),
    #[error("unknown segment '{0}'")]
    InvalidSegment(String),
    #[error("empty model")]
    EmptyModel,
    #[error("empty color")]
    EmptyColor,
    #[error("invalid price '{0}'")]
    InvalidPrice(String),
    #[error("invalid size list '{0}'")]
    InvalidSizes(String),
}

/// Lowercased text after the last dot. A name without a dot is its own
/// extension, which never matches an image type.
pub fn extension_of(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_ascii_lowercase()
}

pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext))
}

/// Decode a product filename.
pub fn parse(filename: &str) -> Result<ProductName, NameError> {
    let (stem, ext) = filename.rsplit_once('.').ok_or(NameError::MissingExtension)?;
    if !is_image_extension(ext) {
        return Err(NameError::UnsupportedExtension(ext.to_string()));
    }

    let fields: Vec<&str> = stem.split(FIELD_SEPARATOR).collect();
    let [brand, segment, model, color, price, sizes] = fields[..] else {
        return Err(NameError::FieldCount(fields.len()));
    };

    let brand = brand_field(brand)?;
    let segment = Segment::parse_label(segment)
        .ok_or_else(|| NameError::InvalidSegment(segment.to_string()))?;
    let model = text_field(model).ok_or(NameError::EmptyModel)?;
    let color = text_field(color).ok_or(NameError::EmptyColor)?;
    let price = price_field(price)?;
    let sizes = sizes_field(sizes)?;

    Ok(ProductName::new(brand, segment, model, color, price, sizes))
}

fn brand_field(s: &str) -> Result<String, NameError> {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(s.to_string())
    } else {
        Err(NameError::InvalidBrand(s.to_string()))
    }
}

// Separator-free by construction since the stem was split on it.
fn text_field(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn price_field(s: &str) -> Result<f64, NameError> {
    if !is_decimal(s) {
        return Err(NameError::InvalidPrice(s.to_string()));
    }
    s.parse::<f64>().map_err(|_| NameError::InvalidPrice(s.to_string()))
}

fn sizes_field(s: &str) -> Result<Vec<String>, NameError> {
    let sizes: Vec<String> = s.split(SIZE_SEPARATOR).map(str::to_string).collect();
    if sizes.iter().all(|size| is_decimal(size)) {
        Ok(sizes)
    } else {
        Err(NameError::InvalidSizes(s.to_string()))
    }
}

/// `\d+(\.\d+)?` with ASCII digits only.
fn is_decimal(s: &str) -> bool {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once('.') {
        Some((int, frac)) => all_digits(int) && all_digits(frac),
        None => all_digits(s),
    }
}
