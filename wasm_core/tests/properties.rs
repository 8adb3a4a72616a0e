use proptest::prelude::*;
use serde_json::{Value, json};

use devkit_core::convert::base::{convert_base, is_valid_in_base};
use devkit_core::convert::binary::{
    ascii_binary_to_bytes, ascii_binary_to_text, bytes_to_ascii_binary, is_valid_ascii_binary,
    is_valid_binary_bytes, text_to_ascii_binary,
};
use devkit_core::convert::formats::{ConvertOptions, FormatTag, convert_formats};
use devkit_core::convert::roman::{arabic_to_roman, is_valid_roman, roman_to_arabic};
use devkit_core::convert::unicode::{text_to_unicode_entities, unicode_entities_to_text};
use devkit_core::entropy::SeededEntropy;
use devkit_core::generate::token::{TokenOptions, generate_token};
use devkit_core::network::mac::{MacFormat, format_mac, is_valid_mac_address};
use devkit_core::{ErrorKind, ToolkitConfig};

fn document() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z]{1,4}_[a-z0-9]{0,8}".prop_map(Value::String),
    ];
    let nested = leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    });
    prop::collection::btree_map("[a-z]{1,6}", nested, 1..4)
        .prop_map(|map| Value::Object(map.into_iter().collect()))
}

proptest! {
    #[test]
    fn roman_round_trips_whole_domain(n in 1i64..=3999) {
        let roman = arabic_to_roman(n).unwrap();
        prop_assert!(is_valid_roman(&roman));
        prop_assert_eq!(i64::from(roman_to_arabic(&roman).unwrap()), n);
    }

    #[test]
    fn roman_rejects_out_of_range(n in prop_oneof![i64::MIN..1, 4000i64..i64::MAX]) {
        prop_assert_eq!(arabic_to_roman(n).unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn ascii_binary_preserves_bytes(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let binary = bytes_to_ascii_binary(&bytes, " ");
        prop_assert!(is_valid_binary_bytes(&binary));
        prop_assert_eq!(ascii_binary_to_bytes(&binary).unwrap(), bytes);
    }

    #[test]
    fn ascii_binary_preserves_text(text in "\\PC{0,32}") {
        let binary = text_to_ascii_binary(&text, " ");
        prop_assert!(is_valid_ascii_binary(&binary));
        prop_assert_eq!(ascii_binary_to_text(&binary).unwrap(), text);
    }

    #[test]
    fn unicode_entities_preserve_text(text in "\\PC{0,32}") {
        let encoded = text_to_unicode_entities(&text);
        prop_assert_eq!(unicode_entities_to_text(&encoded).unwrap(), text);
    }

    #[test]
    fn base_conversion_is_reversible(n in any::<u64>(), base in 2u32..=64) {
        let encoded = convert_base(&n.to_string(), 10, base).unwrap();
        prop_assert!(is_valid_in_base(&encoded, base));
        prop_assert_eq!(convert_base(&encoded, base, 10).unwrap(), n.to_string());
    }

    #[test]
    fn json_survives_yaml_and_toml(doc in document()) {
        let opts = ConvertOptions::default();
        let json_text = serde_json::to_string(&doc).unwrap();
        for via in [FormatTag::Yaml, FormatTag::Toml] {
            let there = convert_formats(FormatTag::Json, via, &json_text, &opts).unwrap();
            let back = convert_formats(via, FormatTag::Json, &there, &opts).unwrap();
            let parsed: Value = serde_json::from_str(&back).unwrap();
            prop_assert_eq!(&parsed, &doc);
        }
    }

    #[test]
    fn generated_hex_pairs_are_valid_macs(bytes in prop::array::uniform6(any::<u8>())) {
        let colon = bytes.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(":");
        prop_assert!(is_valid_mac_address(&colon));
        let formatted = format_mac(&colon, MacFormat::default()).unwrap();
        prop_assert!(is_valid_mac_address(&formatted));
    }

    #[test]
    fn uppercase_only_tokens_stay_uppercase(seed in any::<u64>(), length in 1usize..256) {
        let options = TokenOptions {
            length,
            with_uppercase: true,
            with_lowercase: false,
            with_numbers: false,
            with_symbols: false,
        };
        let token = generate_token(&options, &mut SeededEntropy::new(seed)).unwrap();
        prop_assert_eq!(token.chars().count(), length);
        prop_assert!(token.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn default_token_length_follows_config(seed in any::<u64>(), length in 1usize..512) {
        let config = ToolkitConfig { default_token_length: length, ..ToolkitConfig::default() };
        let token = generate_token(&TokenOptions::from_config(&config), &mut SeededEntropy::new(seed)).unwrap();
        prop_assert_eq!(token.len(), length);
    }
}
