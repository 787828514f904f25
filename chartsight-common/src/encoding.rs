//! Reversible encoding for category values carried in element attributes.
//!
//! Category labels come straight from chart data and may contain markup
//! metacharacters, quotes, or arbitrary Unicode. Legend items never carry the
//! raw value; they carry a base64 token of its UTF-8 bytes, decoded exactly
//! before the value is pushed back into a view signal.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::{Error, Result};

/// Encode a category value as an attribute-safe token.
pub fn encode_category(category: &str) -> String {
    STANDARD.encode(category.as_bytes())
}

/// Decode a category token back to the original value.
pub fn decode_category(token: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(token)
        .map_err(|e| Error::Encoding(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_plain() {
        let token = encode_category("api");
        assert_eq!(decode_category(&token).unwrap(), "api");
    }

    #[test]
    fn test_roundtrip_reserved_characters() {
        for original in ["a&b", "say \"hi\"", "<script>", "x=y;z", "trailing "] {
            let token = encode_category(original);
            assert_eq!(decode_category(&token).unwrap(), original);
        }
    }

    #[test]
    fn test_roundtrip_unicode() {
        for original in ["café", "日本語", "emoji 🚀", "ütf-8"] {
            let token = encode_category(original);
            assert_eq!(decode_category(&token).unwrap(), original);
        }
    }

    #[test]
    fn test_token_is_attribute_safe() {
        let token = encode_category("a&b \"c\" <d>");
        assert!(!token.contains('&'));
        assert!(!token.contains('"'));
        assert!(!token.contains('<'));
    }

    #[test]
    fn test_decode_rejects_invalid_token() {
        assert!(decode_category("not base64!!!").is_err());
    }
}
