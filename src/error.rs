use std::fmt;

pub const MISSING_AUTH_HEADER_MESSAGE: &str = "Missing authorization header";
pub const INVALID_AUTH_HEADER_MESSAGE: &str = "Authorization header invalid";
pub const ISSUER_NOT_CONFIGURED_MESSAGE: &str = "Default issuer not found";

/// Why a credential was rejected as malformed.
#[derive(Debug)]
pub enum Malformed {
    /// The header value does not start with `"Bearer "`.
    Scheme,
    /// The token does not split into exactly three `.`-separated segments.
    Segments,
    /// A header or payload segment is not valid base64url.
    Base64(base64::DecodeError),
    /// A header or payload segment is not the expected JSON.
    Json(serde_json::Error),
    /// The token failed signature or claim verification.
    Decode(jsonwebtoken::errors::Error),
}

/// Every way the authorization pipeline can fail.
///
/// None of these reach the gateway as an error: the decision builder turns
/// each one into a `Deny` whose context `message` is the `Display` text.
#[derive(Debug)]
pub enum AuthorizerError {
    MissingCredential,
    MalformedCredential(Malformed),
    ConfigurationError(String),
    IssuerMismatch(Option<String>),
}

impl AuthorizerError {
    /// Stable identifier for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthorizerError::MissingCredential => "missing_credential",
            AuthorizerError::MalformedCredential(_) => "malformed_credential",
            AuthorizerError::ConfigurationError(_) => "configuration_error",
            AuthorizerError::IssuerMismatch(_) => "issuer_mismatch",
        }
    }
}

impl fmt::Display for AuthorizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizerError::MissingCredential => f.write_str(MISSING_AUTH_HEADER_MESSAGE),
            AuthorizerError::MalformedCredential(Malformed::Scheme | Malformed::Segments) => {
                f.write_str(INVALID_AUTH_HEADER_MESSAGE)
            }
            AuthorizerError::MalformedCredential(Malformed::Base64(e)) => {
                write!(f, "{INVALID_AUTH_HEADER_MESSAGE}: {e}")
            }
            AuthorizerError::MalformedCredential(Malformed::Json(e)) => {
                write!(f, "{INVALID_AUTH_HEADER_MESSAGE}: {e}")
            }
            AuthorizerError::MalformedCredential(Malformed::Decode(e)) => {
                write!(f, "{INVALID_AUTH_HEADER_MESSAGE}: {e}")
            }
            AuthorizerError::ConfigurationError(msg) => f.write_str(msg),
            AuthorizerError::IssuerMismatch(issuer) => {
                write!(
                    f,
                    "Provided issuer is wrong {}",
                    issuer.as_deref().unwrap_or_default()
                )
            }
        }
    }
}

impl std::error::Error for AuthorizerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthorizerError::MalformedCredential(Malformed::Base64(e)) => Some(e),
            AuthorizerError::MalformedCredential(Malformed::Json(e)) => Some(e),
            AuthorizerError::MalformedCredential(Malformed::Decode(e)) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthorizerError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        AuthorizerError::MalformedCredential(Malformed::Decode(e))
    }
}
