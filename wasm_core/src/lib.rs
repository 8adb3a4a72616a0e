use js_sys::{Date, Function, Reflect};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub mod app_state;
pub mod config;
pub mod convert;
pub mod cron;
pub mod entropy;
pub mod error;
pub mod favorites;
pub mod generate;
pub mod hash;
pub mod network;
pub mod qr;
pub mod request;

pub use config::ToolkitConfig;
pub use error::{ConversionOutcome, ErrorKind, Result, ToolError};

use app_state::{AppState, Theme};
use convert::formats::{ConvertOptions, FormatTag};
use entropy::OsEntropy;
use favorites::{FavoriteEntry, KeyValueStore};
use generate::token::TokenOptions;
use generate::ulid::UlidFormat;
use generate::uuid::UuidRequest;
use hash::{HashAlgorithm, HashEncoding};
use network::mac::{LetterCase, MacFormat, MacSeparator};
use qr::QrOptions;
use request::{LatestRequest, RequestTicket};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn from_js<T: DeserializeOwned + Default>(value: JsValue) -> std::result::Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|err| js_error(ToolError::configuration(err.to_string())))
}

/// Thrown errors carry the same `{errorKind, message}` shape as failed outcomes.
fn js_error(err: ToolError) -> JsValue {
    to_js(&ConversionOutcome::from(Err(err))).unwrap_or_else(|fallback| fallback)
}

fn outcome(result: Result<String>) -> JsValue {
    to_js(&ConversionOutcome::from(result)).unwrap_or_else(|err| err)
}

/// Parses a lowercase serde enum name such as `"colon"` or `"base64url"`.
fn parse_enum<T: DeserializeOwned>(label: &str, raw: &str) -> Result<T> {
    let normalized = raw.trim().to_ascii_lowercase();
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| ToolError::configuration(format!("unsupported {label}: {raw}")))
}

fn now_millis() -> u64 {
    Date::now() as u64
}

// ---------------------------------------------------------------------------
// Structured text formats
// ---------------------------------------------------------------------------

fn transform_format_internal(from: &str, to: &str, input: &str, options: &ConvertOptions) -> Result<String> {
    convert::convert_formats(FormatTag::parse(from)?, FormatTag::parse(to)?, input, options)
}

#[wasm_bindgen]
pub fn transform_format(from: &str, to: &str, input: &str, minify: bool) -> JsValue {
    let options = ConvertOptions {
        minify,
        ..ConvertOptions::default()
    };
    outcome(transform_format_internal(from, to, input, &options))
}

#[wasm_bindgen]
pub fn format_content_text(format: &str, input: &str, minify: bool) -> JsValue {
    outcome(FormatTag::parse(format).and_then(|tag| convert::format_content(tag, input, minify)))
}

#[wasm_bindgen]
pub fn is_valid_format(format: &str, input: &str) -> bool {
    FormatTag::parse(format).is_ok_and(|tag| convert::formats::is_valid_format(tag, input))
}

// ---------------------------------------------------------------------------
// Numbers and text encodings
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub fn convert_base(value: &str, from_base: u32, to_base: u32) -> JsValue {
    outcome(convert::base::convert_base(value, from_base, to_base))
}

#[wasm_bindgen]
pub fn is_valid_in_base(value: &str, base: u32) -> bool {
    convert::base::is_valid_in_base(value, base)
}

#[wasm_bindgen]
pub fn convert_number_base(value: &str, from_base: u32) -> std::result::Result<JsValue, JsValue> {
    let bases = convert::base::number_bases(value, from_base).map_err(js_error)?;
    to_js(&bases)
}

#[wasm_bindgen]
pub fn arabic_to_roman(value: f64) -> JsValue {
    outcome(arabic_to_roman_internal(value))
}

fn arabic_to_roman_internal(value: f64) -> Result<String> {
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(ToolError::validation(format!("{value} is not a whole number")));
    }
    convert::roman::arabic_to_roman(value as i64)
}

#[wasm_bindgen]
pub fn roman_to_arabic(input: &str) -> JsValue {
    outcome(convert::roman::roman_to_arabic(input).map(|n| n.to_string()))
}

#[wasm_bindgen]
pub fn is_valid_roman(input: &str) -> bool {
    convert::roman::is_valid_roman(input)
}

#[wasm_bindgen]
pub fn text_to_ascii_binary(text: &str, separator: Option<String>) -> String {
    let separator = separator.unwrap_or_else(|| convert::binary::DEFAULT_SEPARATOR.into());
    convert::binary::text_to_ascii_binary(text, &separator)
}

#[wasm_bindgen]
pub fn ascii_binary_to_text(binary: &str) -> JsValue {
    outcome(convert::binary::ascii_binary_to_text(binary))
}

#[wasm_bindgen]
pub fn text_to_unicode(text: &str) -> String {
    convert::unicode::text_to_unicode_entities(text)
}

#[wasm_bindgen]
pub fn unicode_to_text(input: &str) -> JsValue {
    outcome(convert::unicode::unicode_entities_to_text(input))
}

#[wasm_bindgen]
pub fn is_valid_unicode(input: &str) -> bool {
    convert::unicode::is_valid_unicode_entities(input)
}

#[wasm_bindgen]
pub fn base64_encode(text: &str, url_safe: bool) -> String {
    convert::encoding::base64_encode(text, url_safe)
}

#[wasm_bindgen]
pub fn base64_decode(text: &str, url_safe: bool) -> JsValue {
    outcome(convert::encoding::base64_decode(text, url_safe))
}

#[wasm_bindgen]
pub fn url_encode(input: &str) -> String {
    convert::encoding::url_encode(input)
}

#[wasm_bindgen]
pub fn url_decode(input: &str) -> JsValue {
    outcome(convert::encoding::url_decode(input))
}

#[wasm_bindgen]
pub fn hex_encode(text: &str) -> String {
    convert::encoding::hex_encode(text)
}

#[wasm_bindgen]
pub fn hex_decode(input: &str) -> JsValue {
    outcome(convert::encoding::hex_decode(input))
}

// ---------------------------------------------------------------------------
// Network helpers
// ---------------------------------------------------------------------------

fn mac_format_internal(case: &str, separator: &str) -> Result<MacFormat> {
    Ok(MacFormat {
        case: parse_enum::<LetterCase>("letter case", case)?,
        separator: parse_enum::<MacSeparator>("separator", separator)?,
    })
}

#[wasm_bindgen]
pub fn is_valid_mac_address(input: &str) -> bool {
    network::mac::is_valid_mac_address(input)
}

#[wasm_bindgen]
pub fn is_valid_partial_mac(input: &str) -> bool {
    network::mac::is_valid_partial_mac(input)
}

#[wasm_bindgen]
pub fn format_mac_address(input: &str, case: &str, separator: &str) -> JsValue {
    outcome(mac_format_internal(case, separator).and_then(|fmt| network::mac::format_mac(input, fmt)))
}

#[wasm_bindgen]
pub fn is_valid_ipv4(input: &str) -> bool {
    network::ipv4::is_valid_ipv4(input)
}

#[wasm_bindgen]
pub fn ipv4_to_int(input: &str) -> JsValue {
    outcome(network::ipv4::ipv4_to_int(input).map(|value| value.to_string()))
}

#[wasm_bindgen]
pub fn ipv4_convert(input: &str) -> std::result::Result<JsValue, JsValue> {
    let reps = network::ipv4::ipv4_representations(input).map_err(js_error)?;
    to_js(&reps)
}

#[wasm_bindgen]
pub fn ipv4_info(input: &str) -> std::result::Result<JsValue, JsValue> {
    let info = network::ipv4::ipv4_subnet_info(input).map_err(js_error)?;
    to_js(&info)
}

// ---------------------------------------------------------------------------
// Hashing, cron and QR
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub fn hash_text(text: &str, encoding: &str) -> std::result::Result<JsValue, JsValue> {
    let encoding = parse_enum::<HashEncoding>("encoding", encoding).map_err(js_error)?;
    to_js(&hash::hash_text(text, encoding))
}

fn hmac_text_internal(text: &str, secret: &str, algorithm: &str, encoding: &str) -> Result<String> {
    hash::hmac_text(
        text,
        secret,
        HashAlgorithm::parse(algorithm)?,
        parse_enum::<HashEncoding>("encoding", encoding)?,
    )
}

#[wasm_bindgen]
pub fn hmac_text(text: &str, secret: &str, algorithm: &str, encoding: &str) -> JsValue {
    outcome(hmac_text_internal(text, secret, algorithm, encoding))
}

#[wasm_bindgen]
pub fn bcrypt_verify(password: &str, hashed: &str) -> std::result::Result<bool, JsValue> {
    hash::bcrypt_verify(password, hashed).map_err(js_error)
}

#[wasm_bindgen]
pub fn describe_cron(expression: &str) -> Option<String> {
    cron::describe_cron(expression).map(str::to_string)
}

#[wasm_bindgen]
pub fn is_valid_cron(expression: &str) -> bool {
    cron::is_valid_cron(expression)
}

#[wasm_bindgen]
pub fn cron_reference() -> std::result::Result<JsValue, JsValue> {
    to_js(&cron::CRON_REFERENCE)
}

#[wasm_bindgen]
pub fn render_qr_svg(text: &str, options: JsValue) -> JsValue {
    match from_js::<QrOptions>(options) {
        Ok(options) => outcome(qr::render_qr_svg(text, &options)),
        Err(err) => err,
    }
}

#[wasm_bindgen]
pub fn generate_rsa_key_pair(bits: u32) -> std::result::Result<JsValue, JsValue> {
    let pair = generate::rsa::generate_rsa_key_pair(bits as usize, &mut OsEntropy).map_err(js_error)?;
    to_js(&pair)
}

// ---------------------------------------------------------------------------
// Last-write-wins tracking for asynchronous pages
// ---------------------------------------------------------------------------

/// Hands out request ids; JS drops any result whose id is no longer current.
#[wasm_bindgen]
#[derive(Default)]
pub struct RequestTracker {
    inner: LatestRequest,
}

#[wasm_bindgen]
impl RequestTracker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> u64 {
        self.inner.begin().id()
    }

    pub fn is_current(&self, id: u64) -> bool {
        self.inner.is_current(RequestTicket::from_id(id))
    }
}

// ---------------------------------------------------------------------------
// Session: config-bound generators and persisted UI state
// ---------------------------------------------------------------------------

/// `window.localStorage`, reached through reflection so no DOM bindings are needed.
pub struct BrowserStorage {
    storage: JsValue,
}

impl BrowserStorage {
    pub fn from_global() -> Result<Self> {
        let storage = Reflect::get(&js_sys::global(), &JsValue::from_str("localStorage"))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
            .ok_or_else(|| ToolError::configuration("localStorage is unavailable"))?;
        Ok(Self { storage })
    }

    fn method(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.storage, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.method("getItem")?
            .call1(&self.storage, &JsValue::from_str(key))
            .ok()?
            .as_string()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let set_item = self
            .method("setItem")
            .ok_or_else(|| ToolError::configuration("localStorage.setItem is unavailable"))?;
        set_item
            .call2(&self.storage, &JsValue::from_str(key), &JsValue::from_str(&value))
            .map(|_| ())
            .map_err(|_| ToolError::configuration("localStorage rejected the write"))
    }
}

#[wasm_bindgen]
pub struct Toolkit {
    state: AppState<BrowserStorage>,
}

#[wasm_bindgen]
impl Toolkit {
    /// Hydrates favorites and preferences from `localStorage`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> std::result::Result<Toolkit, JsValue> {
        let config: ToolkitConfig = from_js(config)?;
        let storage = BrowserStorage::from_global().map_err(js_error)?;
        let state = AppState::hydrate(storage, config).map_err(js_error)?;
        Ok(Self { state })
    }

    pub fn theme(&self) -> String {
        match self.state.theme() {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
        .into()
    }

    pub fn set_theme(&mut self, theme: &str) -> std::result::Result<(), JsValue> {
        let theme = parse_enum::<Theme>("theme", theme).map_err(js_error)?;
        self.state.set_theme(theme).map_err(js_error)
    }

    pub fn locale(&self) -> String {
        self.state.locale().to_string()
    }

    pub fn set_locale(&mut self, locale: &str) -> std::result::Result<(), JsValue> {
        self.state.set_locale(locale).map_err(js_error)
    }

    pub fn toggle_favorite(&mut self, entry: JsValue) -> std::result::Result<bool, JsValue> {
        let entry: FavoriteEntry = serde_wasm_bindgen::from_value(entry)
            .map_err(|err| js_error(ToolError::validation(err.to_string())))?;
        self.state.toggle_favorite(entry).map_err(js_error)
    }

    pub fn is_favorited(&self, id: &str) -> bool {
        self.state.is_favorited(id)
    }

    pub fn favorites(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.state.favorites().entries())
    }

    /// Same as [`transform_format`] but indents with the configured width.
    pub fn transform_format(&self, from: &str, to: &str, input: &str, minify: bool) -> JsValue {
        let options = ConvertOptions {
            minify,
            indent: self.state.config().json_indent,
        };
        outcome(transform_format_internal(from, to, input, &options))
    }

    pub fn generate_uuids(&self, request: JsValue) -> std::result::Result<JsValue, JsValue> {
        let request: UuidRequest = serde_wasm_bindgen::from_value(request)
            .map_err(|err| js_error(ToolError::configuration(err.to_string())))?;
        let ids = generate::uuid::generate_uuids(&request, now_millis(), self.state.config(), &mut OsEntropy)
            .map_err(js_error)?;
        to_js(&ids)
    }

    pub fn generate_ulids(&self, count: usize, format: &str) -> JsValue {
        outcome(ulids_internal(self.state.config(), count, format, now_millis()))
    }

    pub fn generate_token(&self, options: JsValue) -> JsValue {
        let options = if options.is_undefined() || options.is_null() {
            TokenOptions::from_config(self.state.config())
        } else {
            match serde_wasm_bindgen::from_value(options) {
                Ok(options) => options,
                Err(err) => return js_error(ToolError::configuration(err.to_string())),
            }
        };
        outcome(generate::token::generate_token(&options, &mut OsEntropy))
    }

    pub fn generate_mac_addresses(
        &self,
        count: usize,
        prefix: &str,
        case: &str,
        separator: &str,
    ) -> std::result::Result<JsValue, JsValue> {
        let format = mac_format_internal(case, separator).map_err(js_error)?;
        let macs = network::mac::generate_mac_addresses(count, prefix, format, self.state.config(), &mut OsEntropy)
            .map_err(js_error)?;
        to_js(&macs)
    }

    pub fn bcrypt_hash(&self, password: &str, cost: Option<u32>) -> JsValue {
        let cost = cost.unwrap_or(self.state.config().bcrypt_default_cost);
        outcome(hash::bcrypt_hash(password, cost, &mut OsEntropy))
    }
}

fn ulids_internal(config: &ToolkitConfig, count: usize, format: &str, now: u64) -> Result<String> {
    let format = parse_enum::<UlidFormat>("ULID format", format)?;
    let ids = generate::ulid::generate_ulids(count, now, config, &mut OsEntropy)?;
    generate::ulid::format_ulids(&ids, format)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
