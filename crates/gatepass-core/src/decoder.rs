//! # Scan Payload Decoder
//!
//! Turns whatever a QR code (or an operator) produced into something the
//! validation authority understands. Tickets carry either a bare ticket id,
//! a validator URL with an `id` query parameter, or a signed token.
//!
//! ## Precedence
//!
//! | Step | Shape | Result |
//! |------|-------|--------|
//! | 1 | `^[A-Za-z0-9_-]{16,}$`, not three dot segments | `TicketId` |
//! | 2 | starts with `/` or `?`, relative URL with `id` | `TicketId` |
//! | 3 | `[?&#]id=` followed by 24 hex characters | `TicketId` |
//! | 4 | absolute URL with `id` | `TicketId` |
//! | 5 | three dot segments longer than 5, 10, 10 | `Token` |
//! | 6 | anything else | `Raw` |
//!
//! No signature is checked here. The token is opaque to the client; only
//! the authority verifies it.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Origin used to resolve relative payloads when none is configured.
const DEFAULT_ORIGIN: &str = "http://localhost/";

/// Classification of a scanned payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DecodedIdentifier {
    /// A ticket identifier, validated through the addressed endpoint.
    TicketId(String),
    /// A signed ticket token, validated through the token endpoint.
    Token(String),
    /// Input that matched no known shape, passed through unchanged.
    Raw(String),
}

impl DecodedIdentifier {
    /// The decoded value regardless of classification.
    pub fn value(&self) -> &str {
        match self {
            Self::TicketId(v) | Self::Token(v) | Self::Raw(v) => v,
        }
    }

    /// Whether this identifier must go through the signed-token endpoint.
    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token(_))
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TicketId(_) => "ticket_id",
            Self::Token(_) => "token",
            Self::Raw(_) => "raw",
        }
    }
}

impl std::fmt::Display for DecodedIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.value())
    }
}

/// Payload decoder bound to the origin relative payloads resolve against.
#[derive(Debug, Clone)]
pub struct Decoder {
    origin: Url,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            origin: default_origin(),
        }
    }
}

impl Decoder {
    /// Create a decoder resolving relative payloads against `origin`.
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    /// The origin relative payloads are resolved against.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Classify a payload. Never fails; see the module table for precedence.
    pub fn decode(&self, payload: &str) -> DecodedIdentifier {
        let text = payload.trim();

        if bare_id_pattern().is_match(text) && text.split('.').count() != 3 {
            return DecodedIdentifier::TicketId(text.to_string());
        }

        if text.starts_with('/') || text.starts_with('?') {
            if let Some(id) = self.origin.join(text).ok().as_ref().and_then(id_param) {
                return DecodedIdentifier::TicketId(id);
            }
        }

        if let Some(caps) = hex_id_pattern().captures(text) {
            return DecodedIdentifier::TicketId(caps[1].to_string());
        }

        if let Some(id) = Url::parse(text).ok().as_ref().and_then(id_param) {
            return DecodedIdentifier::TicketId(id);
        }

        if looks_like_token(text) {
            return DecodedIdentifier::Token(text.to_string());
        }

        DecodedIdentifier::Raw(text.to_string())
    }
}

/// Decode with the default origin.
pub fn decode_payload(payload: &str) -> DecodedIdentifier {
    Decoder::default().decode(payload)
}

/// JWT shape heuristic: three dot-separated segments of length >5, >10, >10.
pub fn looks_like_token(text: &str) -> bool {
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != 3 {
        return false;
    }
    parts[0].len() > 5 && parts[1].len() > 10 && parts[2].len() > 10
}

/// Extract the payload carried by a validator deep link (`...?id=<payload>`).
///
/// Returns `None` when the link is not a URL or has no non-empty `id`.
pub fn deep_link_payload(link: &str) -> Option<String> {
    let trimmed = link.trim();
    let url = Url::parse(trimmed)
        .or_else(|_| default_origin().join(trimmed))
        .ok()?;
    id_param(&url)
}

fn id_param(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == "id")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

fn default_origin() -> Url {
    static ORIGIN: OnceLock<Url> = OnceLock::new();
    ORIGIN
        .get_or_init(|| Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"))
        .clone()
}

fn bare_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{16,}$").expect("bare id pattern compiles"))
}

fn hex_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)[?&#]id=([a-f0-9]{24})").expect("hex id pattern compiles"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_identifier_is_ticket_id() {
        assert_eq!(
            decode_payload("ab12cd34ef56ab12cd34ef56"),
            DecodedIdentifier::TicketId("ab12cd34ef56ab12cd34ef56".into())
        );
        assert_eq!(
            decode_payload("  TKT_2024-000000001  "),
            DecodedIdentifier::TicketId("TKT_2024-000000001".into())
        );
    }

    #[test]
    fn absolute_validator_url_yields_id() {
        let decoded = decode_payload("https://site/validator?id=ab12cd34ef56ab12cd34ef56");
        assert_eq!(
            decoded,
            DecodedIdentifier::TicketId("ab12cd34ef56ab12cd34ef56".into())
        );
    }

    #[test]
    fn relative_path_and_query_resolve_against_origin() {
        assert_eq!(
            decode_payload("/validator?id=42&x=1"),
            DecodedIdentifier::TicketId("42".into())
        );
        assert_eq!(
            decode_payload("?id=abc"),
            DecodedIdentifier::TicketId("abc".into())
        );
    }

    #[test]
    fn relative_without_id_falls_through_to_raw() {
        assert_eq!(
            decode_payload("/validator?x=1"),
            DecodedIdentifier::Raw("/validator?x=1".into())
        );
    }

    #[test]
    fn embedded_hex_id_is_extracted() {
        assert_eq!(
            decode_payload("ingresso #id=AB12CD34EF56AB12CD34EF56 portao"),
            DecodedIdentifier::TicketId("AB12CD34EF56AB12CD34EF56".into())
        );
    }

    #[test]
    fn jwt_shape_is_token() {
        let token = "eyJhbGciOi.eyJ0aWNrZXRJZCI6IjEyMyJ9.c2lnbmF0dXJlLXNpZ25hdHVyZQ";
        let decoded = decode_payload(token);
        assert_eq!(decoded, DecodedIdentifier::Token(token.into()));
        assert!(decoded.is_token());
    }

    #[test]
    fn short_three_part_string_is_not_a_token() {
        let decoded = decode_payload("abc.defghijklmno.pqrstuvwxyz1");
        assert!(!decoded.is_token());
        assert_eq!(decoded, DecodedIdentifier::Raw("abc.defghijklmno.pqrstuvwxyz1".into()));
    }

    #[test]
    fn unrecognised_input_is_raw() {
        assert_eq!(decode_payload("12345"), DecodedIdentifier::Raw("12345".into()));
        assert_eq!(decode_payload("hello world"), DecodedIdentifier::Raw("hello world".into()));
    }

    #[test]
    fn url_without_id_is_raw() {
        assert_eq!(
            decode_payload("https://site/evento/7"),
            DecodedIdentifier::Raw("https://site/evento/7".into())
        );
    }

    #[test]
    fn custom_origin_is_used_for_relative_payloads() {
        let decoder = Decoder::new(Url::parse("https://ingressos.example/app/").unwrap());
        assert_eq!(decoder.origin().host_str(), Some("ingressos.example"));
        assert_eq!(
            decoder.decode("validator?id=9"),
            DecodedIdentifier::Raw("validator?id=9".into())
        );
        assert_eq!(
            decoder.decode("?id=9"),
            DecodedIdentifier::TicketId("9".into())
        );
    }

    #[test]
    fn deep_link_carries_payload() {
        assert_eq!(
            deep_link_payload("https://site/validator?id=eyJ.abc.def").as_deref(),
            Some("eyJ.abc.def")
        );
        assert_eq!(deep_link_payload("/validator?id=77").as_deref(), Some("77"));
        assert!(deep_link_payload("https://site/validator").is_none());
        assert!(deep_link_payload("https://site/validator?id=").is_none());
    }

    #[test]
    fn identifier_serializes_as_tagged_union() {
        let json = serde_json::to_value(DecodedIdentifier::Token("t".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "token", "value": "t"}));
        let json = serde_json::to_value(DecodedIdentifier::TicketId("1".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "ticketId", "value": "1"}));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A 24-character hex id after `id=` is always extracted verbatim.
        #[test]
        fn hex_after_id_param_is_extracted(
            prefix in "[a-z ]{0,12}",
            sep in prop_oneof![Just('?'), Just('&'), Just('#')],
            hex in "[a-fA-F0-9]{24}",
            suffix in "(&[a-z]{1,5}=[a-z0-9]{1,5})?",
        ) {
            let payload = format!("{prefix}{sep}id={hex}{suffix}");
            prop_assert_eq!(decode_payload(&payload), DecodedIdentifier::TicketId(hex));
        }

        /// Three segments meeting the length heuristic classify as a token.
        #[test]
        fn jwt_shaped_strings_are_tokens(
            a in "[A-Za-z0-9_-]{6,20}",
            b in "[A-Za-z0-9_-]{11,40}",
            c in "[A-Za-z0-9_-]{11,40}",
        ) {
            let token = format!("{a}.{b}.{c}");
            prop_assert_eq!(decode_payload(&token), DecodedIdentifier::Token(token.clone()));
        }

        /// Three segments failing the heuristic never classify as a token.
        #[test]
        fn short_segments_are_not_tokens(
            a in "[A-Za-z0-9]{1,5}",
            b in "[A-Za-z0-9]{1,10}",
            c in "[A-Za-z0-9]{1,10}",
        ) {
            let text = format!("{a}.{b}.{c}");
            prop_assert!(!decode_payload(&text).is_token());
        }

        /// The decoder never panics on arbitrary input.
        #[test]
        fn decode_never_panics(input in ".{0,200}") {
            let _ = decode_payload(&input);
        }
    }
}
