//! QR code rendering to SVG.
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ToolError};

pub const QR_MIN_SIZE: u32 = 64;
pub const QR_MAX_SIZE: u32 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    Low,
    #[default]
    Medium,
    Quartile,
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrOptions {
    pub error_correction: ErrorCorrection,
    pub size: u32,
    pub foreground: String,
    pub background: String,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrection::Medium,
            size: 256,
            foreground: "#000000".into(),
            background: "#ffffff".into(),
        }
    }
}

fn is_hex_color(color: &str) -> bool {
    color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

pub fn render_qr_svg(text: &str, options: &QrOptions) -> Result<String> {
    if text.is_empty() {
        return Err(ToolError::validation("QR code text cannot be empty"));
    }
    if !(QR_MIN_SIZE..=QR_MAX_SIZE).contains(&options.size) {
        return Err(ToolError::configuration(format!(
            "QR size must be between {QR_MIN_SIZE} and {QR_MAX_SIZE}"
        )));
    }
    for color in [&options.foreground, &options.background] {
        if !is_hex_color(color) {
            return Err(ToolError::configuration(format!("invalid color: {color}")));
        }
    }
    debug!(len = text.len(), size = options.size, "rendering QR code");
    let code = QrCode::with_error_correction_level(text.as_bytes(), options.error_correction.into())
        .map_err(|err| ToolError::validation(format!("cannot encode QR code: {err}")))?;
    Ok(code
        .render::<svg::Color<'_>>()
        .min_dimensions(options.size, options.size)
        .dark_color(svg::Color(&options.foreground))
        .light_color(svg::Color(&options.background))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_svg_document() {
        let svg = render_qr_svg("https://example.com", &QrOptions::default()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#000000"));
    }

    #[test]
    fn rejects_empty_text_and_bad_colors() {
        assert!(matches!(
            render_qr_svg("", &QrOptions::default()).unwrap_err(),
            ToolError::Validation(_)
        ));
        let options = QrOptions {
            foreground: "black".into(),
            ..QrOptions::default()
        };
        assert!(matches!(
            render_qr_svg("x", &options).unwrap_err(),
            ToolError::Configuration(_)
        ));
    }

    #[test]
    fn oversized_payload_is_validation_error() {
        let payload = "x".repeat(8000);
        assert!(render_qr_svg(&payload, &QrOptions::default()).is_err());
    }
}
