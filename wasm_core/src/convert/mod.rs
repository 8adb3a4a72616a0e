pub mod base;
pub mod binary;
pub mod encoding;
pub mod formats;
pub mod json_utils;
pub mod roman;
pub mod unicode;
pub mod xml;

pub use formats::{ConversionRequest, ConvertOptions, FormatTag, convert_formats, format_content};
