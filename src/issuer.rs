use crate::error::{AuthorizerError, ISSUER_NOT_CONFIGURED_MESSAGE};
use crate::token::Claims;

/// Accept the claims only if their issuer equals the allowed issuer,
/// ignoring ASCII case.
///
/// A missing allowed issuer is a deployment problem, but it is still
/// reported to the gateway as an ordinary denial.
pub fn check_issuer(claims: &Claims, allowed_issuer: Option<&str>) -> Result<(), AuthorizerError> {
    let allowed_issuer = match allowed_issuer {
        Some(issuer) if !issuer.is_empty() => issuer,
        _ => {
            return Err(AuthorizerError::ConfigurationError(
                ISSUER_NOT_CONFIGURED_MESSAGE.to_string(),
            ))
        }
    };

    match claims.issuer() {
        Some(issuer) if issuer.eq_ignore_ascii_case(allowed_issuer) => Ok(()),
        issuer => Err(AuthorizerError::IssuerMismatch(issuer.map(str::to_string))),
    }
}
