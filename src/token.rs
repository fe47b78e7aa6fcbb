use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::TokenVerification;
use crate::error::{AuthorizerError, Malformed};

pub const BEARER_PREFIX: &str = "Bearer ";

/// Claims carried by a bearer token.
///
/// Only the issuer is consulted when deciding; every other claim is kept
/// as raw JSON.
#[derive(Debug, Deserialize)]
pub struct Claims {
    #[serde(default)]
    iss: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Claims {
    pub fn issuer(&self) -> Option<&str> {
        self.iss.as_deref()
    }
}

/// Validate the `Authorization` header value and decode its bearer token.
pub fn validate_bearer(
    auth_header: Option<&str>,
    verification: &TokenVerification,
) -> Result<Claims, AuthorizerError> {
    let auth_header = match auth_header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthorizerError::MissingCredential),
    };

    let token = auth_header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthorizerError::MalformedCredential(Malformed::Scheme))?;

    // Trailing empty segments do not count, so `a.b.` has two.
    if token.trim_end_matches('.').split('.').count() != 3 {
        return Err(AuthorizerError::MalformedCredential(Malformed::Segments));
    }

    decode_claims(token, verification)
}

fn decode_claims(token: &str, verification: &TokenVerification) -> Result<Claims, AuthorizerError> {
    match verification {
        TokenVerification::DecodeOnly => {
            let segments: Vec<&str> = token.split('.').collect();
            let [header, payload, _signature] = segments[..] else {
                return Err(AuthorizerError::MalformedCredential(Malformed::Segments));
            };

            // The header only has to be a JSON object; its `alg` is never consulted.
            decode_segment::<Map<String, Value>>(header)?;
            decode_segment(payload)
        }
        TokenVerification::Verified { algorithm, key } => {
            let mut validation = Validation::new(*algorithm);
            validation.validate_nbf = true;
            validation.validate_aud = false;

            Ok(jsonwebtoken::decode::<Claims>(token, key, &validation)?.claims)
        }
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, AuthorizerError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthorizerError::MalformedCredential(Malformed::Base64(e)))?;

    serde_json::from_slice(&bytes).map_err(|e| AuthorizerError::MalformedCredential(Malformed::Json(e)))
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use serde_json::json;

    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn sign(claims: &Value, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn future_exp() -> u64 {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        now + 900
    }

    #[test]
    fn test_missing_header() {
        let err = validate_bearer(None, &TokenVerification::DecodeOnly).unwrap_err();
        assert!(matches!(err, AuthorizerError::MissingCredential));

        let err = validate_bearer(Some(""), &TokenVerification::DecodeOnly).unwrap_err();
        assert!(matches!(err, AuthorizerError::MissingCredential));
    }

    #[test]
    fn test_wrong_scheme() {
        for value in ["Token abc", "bearer a.b.c", "Bearer", "Basic dXNlcjpwYXNz"] {
            let err = validate_bearer(Some(value), &TokenVerification::DecodeOnly).unwrap_err();
            assert!(
                matches!(err, AuthorizerError::MalformedCredential(Malformed::Scheme)),
                "{value}"
            );
        }
    }

    #[test]
    fn test_wrong_segment_count() {
        for value in ["Bearer a.b", "Bearer abc", "Bearer a.b.c.d", "Bearer "] {
            let err = validate_bearer(Some(value), &TokenVerification::DecodeOnly).unwrap_err();
            assert!(
                matches!(err, AuthorizerError::MalformedCredential(Malformed::Segments)),
                "{value}"
            );
        }
    }

    #[test]
    fn test_trailing_empty_segments_not_counted() {
        for value in ["Bearer a.b.", "Bearer a.b..", "Bearer ..."] {
            let err = validate_bearer(Some(value), &TokenVerification::DecodeOnly).unwrap_err();
            assert!(
                matches!(err, AuthorizerError::MalformedCredential(Malformed::Segments)),
                "{value}"
            );
            assert_eq!(err.to_string(), "Authorization header invalid");
        }
    }

    #[test]
    fn test_undecodable_token() {
        let err = validate_bearer(Some("Bearer a.b.c"), &TokenVerification::DecodeOnly).unwrap_err();
        assert!(matches!(
            err,
            AuthorizerError::MalformedCredential(Malformed::Base64(_))
        ));
        assert!(err.to_string().starts_with("Authorization header invalid: "));
    }

    #[test]
    fn test_payload_not_json() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode("not json");
        let value = format!("Bearer {header}.{payload}.sig");

        let err = validate_bearer(Some(value.as_str()), &TokenVerification::DecodeOnly).unwrap_err();
        assert!(matches!(
            err,
            AuthorizerError::MalformedCredential(Malformed::Json(_))
        ));
    }

    #[test]
    fn test_decode_only_ignores_header_algorithm() {
        let payload = URL_SAFE_NO_PAD.encode(r#"{"iss":"https://issuer.example"}"#);

        for jose_header in [
            r#"{"alg":"none"}"#,
            r#"{"alg":"ES512"}"#,
            r#"{"typ":"JWT"}"#,
        ] {
            let value = format!("Bearer {}.{payload}.sig", URL_SAFE_NO_PAD.encode(jose_header));

            let claims = validate_bearer(Some(value.as_str()), &TokenVerification::DecodeOnly)
                .unwrap_or_else(|e| panic!("{jose_header}: {e}"));
            assert_eq!(claims.issuer(), Some("https://issuer.example"));
        }
    }

    #[test]
    fn test_decode_only_ignores_signature_and_expiry() {
        let token = sign(
            &json!({ "iss": "https://issuer.example", "exp": 1, "sub": "user-1" }),
            b"some-other-secret",
        );
        let header = format!("Bearer {token}");

        let claims = validate_bearer(Some(header.as_str()), &TokenVerification::DecodeOnly).unwrap();
        assert_eq!(claims.issuer(), Some("https://issuer.example"));
        assert_eq!(claims.other.get("sub"), Some(&json!("user-1")));
    }

    #[test]
    fn test_decode_only_without_issuer() {
        let token = sign(&json!({ "sub": "user-1" }), SECRET);
        let header = format!("Bearer {token}");

        let claims = validate_bearer(Some(header.as_str()), &TokenVerification::DecodeOnly).unwrap();
        assert_eq!(claims.issuer(), None);
    }

    #[test]
    fn test_verified_accepts_valid_signature() {
        let verification = TokenVerification::from_key("HS256", "test-secret").unwrap();
        let token = sign(&json!({ "iss": "https://issuer.example", "exp": future_exp() }), SECRET);
        let header = format!("Bearer {token}");

        let claims = validate_bearer(Some(header.as_str()), &verification).unwrap();
        assert_eq!(claims.issuer(), Some("https://issuer.example"));
    }

    #[test]
    fn test_verified_rejects_forged_signature() {
        let verification = TokenVerification::from_key("HS256", "test-secret").unwrap();
        let token = sign(
            &json!({ "iss": "https://issuer.example", "exp": future_exp() }),
            b"attacker-secret",
        );
        let header = format!("Bearer {token}");

        let err = validate_bearer(Some(header.as_str()), &verification).unwrap_err();
        assert!(matches!(
            err,
            AuthorizerError::MalformedCredential(Malformed::Decode(_))
        ));
    }

    #[test]
    fn test_verified_rejects_expired_token() {
        let verification = TokenVerification::from_key("HS256", "test-secret").unwrap();
        let token = sign(&json!({ "iss": "https://issuer.example", "exp": 1 }), SECRET);
        let header = format!("Bearer {token}");

        assert!(validate_bearer(Some(header.as_str()), &verification).is_err());
    }
}
