//! Property-based tests
//!
//! 1. Fragmentation invariance: however character data is delivered, the
//!    accumulated element text equals the logical content.
//! 2. Character references decode to the referenced character.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use saxtree::parse_str;

proptest! {
    #[test]
    fn prop_plain_text_roundtrips(text in "[a-zA-Z0-9 .,_-]{0,64}") {
        let document = format!("<a>{text}</a>");
        let root = parse_str(&document).unwrap();
        prop_assert_eq!(root.text(), text.as_str());
    }

    #[test]
    fn prop_entities_fragment_but_accumulate(
        left in "[a-z]{1,16}",
        right in "[a-z]{1,16}",
    ) {
        // &amp; forces at least three separate character callbacks.
        let document = format!("<a>{left}&amp;{right}</a>");
        let root = parse_str(&document).unwrap();
        prop_assert_eq!(root.text(), format!("{left}&{right}"));
    }

    #[test]
    fn prop_decimal_character_references_decode(code in 0x21u32..0x7f) {
        let ch = char::from_u32(code).unwrap();
        prop_assume!(!matches!(ch, '<' | '&'));
        let document = format!("<a>&#{code};</a>");
        let root = parse_str(&document).unwrap();
        prop_assert_eq!(root.text(), ch.to_string());
    }

    #[test]
    fn prop_hex_character_references_decode(code in 0x21u32..0x7f) {
        let ch = char::from_u32(code).unwrap();
        prop_assume!(!matches!(ch, '<' | '&'));
        let document = format!("<a>&#x{code:x};</a>");
        let root = parse_str(&document).unwrap();
        prop_assert_eq!(root.text(), ch.to_string());
    }

    #[test]
    fn prop_attribute_values_roundtrip(value in "[a-zA-Z0-9 ]{0,32}") {
        let document = format!("<a v=\"{value}\"/>");
        let root = parse_str(&document).unwrap();
        prop_assert_eq!(root.attribute("v"), Some(value.as_str()));
    }
}
