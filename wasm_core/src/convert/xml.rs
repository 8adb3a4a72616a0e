// Small JSON <-> XML mapping. Element order is not preserved across repeated siblings.
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

use crate::convert::json_utils::ordered_keys;
use crate::error::{Result, ToolError};

const ROOT_ELEMENT: &str = "root";
const TEXT_KEY: &str = "#text";

const ITEM_ELEMENT: &str = "item";

/// Renders a JSON value as an XML document wrapped in a `<root>` element.
/// A top-level array becomes `<item>` children of the root.
pub fn value_to_xml(value: &Value) -> Result<String> {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    match value {
        Value::Array(items) => {
            out.push_str(&format!("<{ROOT_ELEMENT}>\n"));
            for item in items {
                build_xml(&mut out, ITEM_ELEMENT, item, 1)?;
            }
            out.push_str(&format!("</{ROOT_ELEMENT}>\n"));
        }
        _ => build_xml(&mut out, ROOT_ELEMENT, value, 0)?,
    }
    Ok(out)
}

/// XML 1.0 name: a letter or `_` first, then letters, digits, `-`, `_` or `.`.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn check_name(name: &str) -> Result<()> {
    if is_xml_name(name) {
        Ok(())
    } else {
        Err(ToolError::validation(format!(
            "\"{name}\" is not a valid XML element or attribute name"
        )))
    }
}

fn build_xml(buf: &mut String, name: &str, value: &Value, depth: usize) -> Result<()> {
    check_name(name)?;
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            let mut open = format!("{indent}<{name}");
            let mut children = Vec::new();
            for key in ordered_keys(map) {
                let Some(child) = map.get(&key) else {
                    continue;
                };
                match key.strip_prefix('@') {
                    Some(attr) if !child.is_object() && !child.is_array() => {
                        check_name(attr)?;
                        open.push_str(&format!(" {attr}=\"{}\"", xml_escape(&scalar_text(child))));
                    }
                    _ => children.push((key, child)),
                }
            }
            let text = map.get(TEXT_KEY).map(scalar_text);
            let children: Vec<_> = children.into_iter().filter(|(k, _)| k != TEXT_KEY).collect();
            if children.is_empty() {
                let text = text.unwrap_or_default();
                buf.push_str(&format!("{open}>{}</{name}>\n", xml_escape(&text)));
                return Ok(());
            }
            buf.push_str(&format!("{open}>\n"));
            if let Some(text) = text {
                buf.push_str(&format!("{indent}  {}\n", xml_escape(&text)));
            }
            for (key, child) in children {
                build_xml(buf, &key, child, depth + 1)?;
            }
            buf.push_str(&format!("{indent}</{name}>\n"));
        }
        // Repeated siblings; nested arrays flatten into the same run.
        Value::Array(items) => {
            for item in items {
                build_xml(buf, name, item, depth)?;
            }
        }
        _ => {
            buf.push_str(&format!(
                "{indent}<{name}>{}</{name}>\n",
                xml_escape(&scalar_text(value))
            ));
        }
    }
    Ok(())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Parses an XML document into JSON. Repeated tags become arrays, leaves become strings,
/// attributes are stored under `@name` keys.
pub fn xml_to_value(input: &str) -> Result<Value> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| ToolError::validation(format!("invalid XML: {err}")))?;
        match event {
            Event::Start(tag) => {
                if root.is_some() {
                    return Err(ToolError::validation("XML documents have exactly one root"));
                }
                stack.push(XmlElement::from_tag(&tag)?);
            }
            Event::Empty(tag) => {
                let node = XmlElement::from_tag(&tag)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                if let Some(node) = stack.pop() {
                    attach(&mut stack, &mut root, node)?;
                }
            }
            Event::Text(text) => {
                let unescaped = text
                    .unescape()
                    .map_err(|err| ToolError::validation(format!("invalid XML text: {err}")))?;
                match stack.last_mut() {
                    Some(current) => current.value.push_str(&unescaped),
                    None => return Err(ToolError::validation("text outside of the root element")),
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .value
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    if let Some(open) = stack.last() {
        return Err(ToolError::validation(format!(
            "unclosed XML element <{}>",
            open.name
        )));
    }
    let root = root.ok_or_else(|| ToolError::validation("invalid XML: no root element"))?;
    Ok(element_to_value(&root))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    node: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_some() {
        return Err(ToolError::validation("XML documents have exactly one root"));
    } else {
        *root = Some(node);
    }
    Ok(())
}

fn element_to_value(el: &XmlElement) -> Value {
    if el.children.is_empty() && el.attributes.is_empty() {
        return Value::String(el.value.trim().to_string());
    }
    let mut obj = Map::new();
    for (key, value) in &el.attributes {
        obj.insert(format!("@{key}"), Value::String(value.clone()));
    }
    let text = el.value.trim();
    if !text.is_empty() {
        obj.insert(TEXT_KEY.into(), Value::String(text.to_string()));
    }
    for child in &el.children {
        let value = element_to_value(child);
        match obj.get_mut(&child.name) {
            None => {
                obj.insert(child.name.clone(), value);
            }
            Some(Value::Array(arr)) => arr.push(value),
            Some(entry) => {
                let existing = entry.take();
                *entry = Value::Array(vec![existing, value]);
            }
        }
    }
    Value::Object(obj)
}

#[derive(Debug, Clone)]
struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    value: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn from_tag(tag: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(tag.name().as_ref()).trim().to_string();
        let mut attributes = Vec::new();
        for attr in tag.attributes() {
            let attr =
                attr.map_err(|err| ToolError::validation(format!("invalid XML attribute: {err}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr
                .unescape_value()
                .map_err(|err| ToolError::validation(format!("invalid XML attribute: {err}")))?;
            attributes.push((key, value.into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            value: String::new(),
            children: Vec::new(),
        })
    }
}
