// JSON/TOML/YAML value bridges shared by the structured-text converters.
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::{Result, ToolError};

/// Parses a JSON string into `serde_json::Value` with a readable validation message.
///
/// # Example
/// ```
/// use devkit_core::convert::json_utils::parse_json;
/// let value = parse_json("{\"id\":1}")?;
/// assert_eq!(value["id"], 1);
/// # Ok::<(), devkit_core::ToolError>(())
/// ```
pub fn parse_json(input: &str) -> Result<Value> {
    serde_json::from_str(input).map_err(|err| ToolError::validation(format!("invalid JSON: {err}")))
}

/// Encodes a JSON `Value`, either compact or pretty-printed with `indent` spaces.
/// Trailing newlines are trimmed so the output drops straight into a text area.
pub fn encode_json(value: &Value, minify: bool, indent: usize) -> Result<String> {
    let serialized = if minify {
        serde_json::to_string(value).map_err(|err| ToolError::validation(err.to_string()))?
    } else {
        let pad = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(pad.as_bytes());
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value
            .serialize(&mut serializer)
            .map_err(|err| ToolError::validation(err.to_string()))?;
        String::from_utf8(buf).map_err(|err| ToolError::validation(err.to_string()))?
    };
    Ok(serialized.trim_end().to_string())
}

/// Returns keys of a JSON object sorted alphabetically for deterministic output.
pub fn ordered_keys(map: &Map<String, Value>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

/// Converts a `serde_yaml::Value` into JSON, unwrapping tagged values.
pub fn yaml_to_json(value: serde_yaml::Value) -> Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(num) => {
            if let Some(i) = num.as_i64() {
                Value::Number(Number::from(i))
            } else if let Some(u) = num.as_u64() {
                Value::Number(Number::from(u))
            } else {
                let f = num.as_f64().unwrap_or(f64::NAN);
                Number::from_f64(f).map(Value::Number).ok_or_else(|| {
                    ToolError::validation(format!("YAML number {num} has no JSON representation"))
                })?
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            let mut obj = Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    _ => return Err(ToolError::validation("YAML mapping keys must be scalars")),
                };
                obj.insert(key, yaml_to_json(v)?);
            }
            Value::Object(obj)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

/// Converts a TOML value into JSON; datetimes become their RFC 3339 text.
pub fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(Number::from(i)),
        toml::Value::Float(f) => Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            let mut obj = Map::new();
            for (k, v) in table {
                obj.insert(k, toml_to_json(v));
            }
            Value::Object(obj)
        }
    }
}

/// Converts JSON into TOML. TOML has no null, so nulls are rejected instead of guessed.
///
/// # Example
/// ```
/// use serde_json::json;
/// use devkit_core::convert::json_utils::json_to_toml;
/// let toml = json_to_toml(&json!({"name":"Ada"}))?;
/// assert_eq!(toml["name"].as_str(), Some("Ada"));
/// # Ok::<(), devkit_core::ToolError>(())
/// ```
pub fn json_to_toml(value: &Value) -> Result<toml::Value> {
    match value {
        Value::Null => Err(ToolError::validation("TOML cannot represent null values")),
        Value::Bool(b) => Ok(toml::Value::Boolean(*b)),
        Value::Number(num) => {
            if let Some(i) = num.as_i64() {
                Ok(toml::Value::Integer(i))
            } else if let Some(u) = num.as_u64() {
                Err(ToolError::validation(format!(
                    "integer {u} exceeds the TOML 64-bit signed range"
                )))
            } else if let Some(f) = num.as_f64() {
                Ok(toml::Value::Float(f))
            } else {
                Err(ToolError::validation("unsupported number"))
            }
        }
        Value::String(s) => Ok(toml::Value::String(s.clone())),
        Value::Array(arr) => Ok(toml::Value::Array(
            arr.iter().map(json_to_toml).collect::<Result<Vec<_>>>()?,
        )),
        Value::Object(map) => {
            let mut table = toml::value::Table::new();
            for (k, v) in map {
                table.insert(k.clone(), json_to_toml(v)?);
            }
            Ok(toml::Value::Table(table))
        }
    }
}
