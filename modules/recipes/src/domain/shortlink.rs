//! Stateless short-link tokens: the decimal recipe id, base64url-encoded
//! without padding. Decoding tolerates padded tokens.

use base64::{
    alphabet,
    engine::{general_purpose, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};

use crate::contract::model::RecipeId;
use crate::domain::error::DomainError;

const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn encode(id: RecipeId) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(id.to_string())
}

/// Inverse of [`encode`]. Every malformed input maps to `InvalidToken`.
pub fn decode(token: &str) -> Result<RecipeId, DomainError> {
    let bytes = LENIENT_URL_SAFE
        .decode(token.trim_end_matches('/'))
        .map_err(|_| DomainError::invalid_token())?;
    let digits = std::str::from_utf8(&bytes).map_err(|_| DomainError::invalid_token())?;
    let id: RecipeId = digits.parse().map_err(|_| DomainError::invalid_token())?;

    // Canonical positive decimals only: "05" and "+5" do not decode.
    if id <= 0 || id.to_string() != digits {
        return Err(DomainError::invalid_token());
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_positive_ids() {
        let samples = (1..=2_000).chain([
            9_999,
            10_000,
            65_535,
            1_000_000,
            123_456_789,
            RecipeId::MAX - 1,
            RecipeId::MAX,
        ]);
        for id in samples {
            let token = encode(id);
            assert_eq!(decode(&token).unwrap(), id, "token {token}");
        }
    }

    #[test]
    fn tokens_are_url_safe_and_unpadded() {
        for id in [1, 12, 123, 1234, 98_765, RecipeId::MAX] {
            let token = encode(id);
            assert!(
                token
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "{token}"
            );
        }
        // "1" -> "MQ==" in standard base64.
        assert_eq!(encode(1), "MQ");
        assert_eq!(encode(42), "NDI");
    }

    #[test]
    fn padded_token_and_trailing_slash_are_accepted() {
        assert_eq!(decode("MQ==").unwrap(), 1);
        assert_eq!(decode("NDI=").unwrap(), 42);
        assert_eq!(decode("NDI/").unwrap(), 42);
    }

    #[test]
    fn malformed_tokens_are_invalid() {
        let bad = [
            "",
            "!!!",
            "M",
            "YWJj",             // "abc"
            "LTE",              // "-1"
            "MA",               // "0"
            "MDU",              // "05"
            "KzU",              // "+5"
            "OTk5OTk5OTk5OTk5", // overflows i32
            "_-_-",
            "%00",
        ];
        for token in bad {
            assert!(
                matches!(decode(token), Err(DomainError::InvalidToken)),
                "{token:?} should be rejected"
            );
        }
    }

    #[test]
    fn non_utf8_payload_is_invalid() {
        let token = general_purpose::URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0x31]);
        assert!(matches!(decode(&token), Err(DomainError::InvalidToken)));
    }
}
