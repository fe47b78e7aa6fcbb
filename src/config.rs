use std::env;
use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey};

use crate::error::AuthorizerError;

const REGION_VAR: &str = "aws_region";
const LAMBDA_REGION_VAR: &str = "AWS_REGION";
const ISSUER_ALLOWED_VAR: &str = "issuer_allowed";
const VERIFICATION_KEY_VAR: &str = "jwt_verification_key";
const ALGORITHM_VAR: &str = "jwt_algorithm";
const DEFAULT_ALGORITHM: &str = "ES256";

/// How bearer tokens are decoded.
#[derive(Clone)]
pub enum TokenVerification {
    /// Claims are decoded without checking the signature.
    DecodeOnly,
    /// Signature, `exp` and `nbf` are checked before the claims are trusted.
    Verified {
        algorithm: Algorithm,
        key: DecodingKey,
    },
}

impl TokenVerification {
    /// Build a verifier from an algorithm name and key material.
    ///
    /// HMAC algorithms take the raw shared secret; every other family takes
    /// a PEM-encoded public key.
    pub fn from_key(algorithm: &str, key: &str) -> Result<Self, AuthorizerError> {
        let algorithm = Algorithm::from_str(algorithm).map_err(|e| {
            AuthorizerError::ConfigurationError(format!("Unsupported JWT algorithm {algorithm}: {e}"))
        })?;

        let key = match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                Ok(DecodingKey::from_secret(key.as_bytes()))
            }
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(key.as_bytes()),
            Algorithm::EdDSA => DecodingKey::from_ed_pem(key.as_bytes()),
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(key.as_bytes()),
        }
        .map_err(|e| {
            AuthorizerError::ConfigurationError(format!("Failed to load JWT verification key: {e}"))
        })?;

        Ok(TokenVerification::Verified { algorithm, key })
    }
}

/// Process-wide settings, read once and then only borrowed.
#[derive(Clone)]
pub struct AuthorizerConfig {
    pub region: String,
    pub allowed_issuer: Option<String>,
    pub verification: TokenVerification,
}

impl AuthorizerConfig {
    pub fn new(region: impl Into<String>, allowed_issuer: Option<String>) -> Self {
        Self {
            region: region.into(),
            allowed_issuer,
            verification: TokenVerification::DecodeOnly,
        }
    }

    pub fn with_verification(mut self, verification: TokenVerification) -> Self {
        self.verification = verification;
        self
    }

    pub fn from_env() -> Result<Self, AuthorizerError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthorizerError> {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let region = get(REGION_VAR).or_else(|| get(LAMBDA_REGION_VAR)).ok_or_else(|| {
            AuthorizerError::ConfigurationError(format!(
                "Neither {REGION_VAR} nor {LAMBDA_REGION_VAR} is set"
            ))
        })?;

        let allowed_issuer = get(ISSUER_ALLOWED_VAR);
        if allowed_issuer.is_none() {
            tracing::warn!("{ISSUER_ALLOWED_VAR} not set, every request will be denied");
        }

        let verification = match get(VERIFICATION_KEY_VAR) {
            Some(key) => {
                let algorithm = get(ALGORITHM_VAR).unwrap_or_else(|| DEFAULT_ALGORITHM.to_string());
                let verification = TokenVerification::from_key(&algorithm, &key)?;
                tracing::info!("JWT signature verification enabled ({algorithm})");
                verification
            }
            None => {
                tracing::info!("{VERIFICATION_KEY_VAR} not set, token signatures are not verified");
                TokenVerification::DecodeOnly
            }
        };

        Ok(Self {
            region,
            allowed_issuer,
            verification,
        })
    }
}
