//! Structured-text format conversion.
//!
//! Every source format is parsed into a `serde_json::Value` and then rendered
//! into the target, so a single error type covers every pair. Round trips are
//! semantically lossless for scalars, arrays and string-keyed objects; key
//! order and number formatting are not preserved.
//!
//! # Examples
//!
//! ```rust
//! use devkit_core::convert::formats::{convert_formats, ConvertOptions, FormatTag};
//!
//! let yaml = convert_formats(FormatTag::Json, FormatTag::Yaml, r#"{"name":"Ada"}"#, &ConvertOptions::default())?;
//! assert_eq!(yaml.trim(), "name: Ada");
//! # Ok::<(), devkit_core::ToolError>(())
//! ```
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::convert::json_utils::{encode_json, json_to_toml, parse_json, toml_to_json, yaml_to_json};
use crate::convert::xml;
use crate::error::{Result, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Json,
    Yaml,
    Toml,
    Xml,
}

impl FormatTag {
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "xml" => Ok(Self::Xml),
            other => Err(ToolError::validation(format!("unsupported format: {other}"))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
            Self::Xml => "XML",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Compact output where the target format supports it (JSON only).
    pub minify: bool,
    /// Spaces per nesting level for pretty JSON.
    pub indent: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            minify: false,
            indent: 2,
        }
    }
}

/// One conversion as issued by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub raw_input: String,
    pub source_format: FormatTag,
    pub target_format: FormatTag,
    #[serde(default)]
    pub options: ConvertOptions,
}

impl ConversionRequest {
    pub fn run(&self) -> Result<String> {
        convert_formats(
            self.source_format,
            self.target_format,
            &self.raw_input,
            &self.options,
        )
    }
}

/// Parses `input` under the grammar of `format`.
pub fn parse_document(format: FormatTag, input: &str) -> Result<Value> {
    match format {
        FormatTag::Json => parse_json(input),
        FormatTag::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(input)
                .map_err(|err| ToolError::validation(format!("invalid YAML: {err}")))?;
            yaml_to_json(yaml)
        }
        FormatTag::Toml => {
            let toml_value = input
                .parse::<toml::Table>()
                .map_err(|err| ToolError::validation(format!("invalid TOML: {err}")))?;
            Ok(toml_to_json(toml::Value::Table(toml_value)))
        }
        FormatTag::Xml => xml::xml_to_value(input),
    }
}

/// Renders a parsed document in `format`.
pub fn render_document(format: FormatTag, value: &Value, options: &ConvertOptions) -> Result<String> {
    match format {
        FormatTag::Json => encode_json(value, options.minify, options.indent),
        FormatTag::Yaml => serde_yaml::to_string(value)
            .map_err(|err| ToolError::validation(format!("cannot render YAML: {err}"))),
        FormatTag::Toml => {
            if !value.is_object() {
                return Err(ToolError::validation(
                    "TOML documents need an object at the top level",
                ));
            }
            let toml_value = json_to_toml(value)?;
            toml::to_string_pretty(&toml_value)
                .map_err(|err| ToolError::validation(format!("cannot render TOML: {err}")))
        }
        FormatTag::Xml => xml::value_to_xml(value),
    }
}

/// Converts between JSON, YAML, TOML and XML. Blank input yields blank output.
///
/// # Examples
/// ```
/// use devkit_core::convert::formats::{convert_formats, ConvertOptions, FormatTag};
///
/// let opts = ConvertOptions::default();
/// let yaml = convert_formats(FormatTag::Json, FormatTag::Yaml, "{\"id\":1}", &opts)?;
/// let back = convert_formats(FormatTag::Yaml, FormatTag::Json, &yaml, &opts)?;
/// assert!(back.contains("\"id\": 1"));
/// # Ok::<(), devkit_core::ToolError>(())
/// ```
pub fn convert_formats(
    from: FormatTag,
    to: FormatTag,
    input: &str,
    options: &ConvertOptions,
) -> Result<String> {
    if input.trim().is_empty() {
        return Ok(String::new());
    }
    debug!(from = from.label(), to = to.label(), len = input.len(), "converting document");
    let value = parse_document(from, input)?;
    render_document(to, &value, options)
}

/// Cheap validity probe backed by the same parser as [`convert_formats`].
pub fn is_valid_format(format: FormatTag, input: &str) -> bool {
    input.trim().is_empty() || parse_document(format, input).is_ok()
}

/// Pretty-prints or minifies a document in place. Only JSON has a minified form;
/// the other formats are normalized through the parser.
///
/// # Examples
/// ```
/// use devkit_core::convert::formats::{format_content, FormatTag};
/// let minified = format_content(FormatTag::Json, "{ \"a\": 1 }", true)?;
/// assert_eq!(minified, "{\"a\":1}");
/// # Ok::<(), devkit_core::ToolError>(())
/// ```
pub fn format_content(format: FormatTag, input: &str, minify: bool) -> Result<String> {
    let options = ConvertOptions {
        minify,
        ..ConvertOptions::default()
    };
    convert_formats(format, format, input, &options)
}
