use lambda_http::{Error, LambdaEvent};

use crate::{
    config::AuthorizerConfig,
    decision::{build_decision, resource_arn, Decision},
    error::AuthorizerError,
    headers::extract_auth_header,
    issuer::check_issuer,
    request::AuthorizerRequest,
    token::validate_bearer,
};

/// Runs the extract → validate → issuer check → decide pipeline.
///
/// Holds nothing but read-only configuration, so one instance is shared
/// by every invocation.
pub struct Authorizer {
    config: AuthorizerConfig,
}

impl Authorizer {
    pub fn new(config: AuthorizerConfig) -> Self {
        Self { config }
    }

    /// Decide on a single request. Every failure becomes a `Deny`.
    pub fn authorize(&self, request: &AuthorizerRequest) -> Decision {
        let auth_header = extract_auth_header(request.headers.as_ref());
        tracing::info!(
            "Received request header Authorization : {}",
            auth_header.unwrap_or_default()
        );

        let ctx = &request.request_context;
        let resource = resource_arn(&self.config.region, ctx);

        let outcome = self.check(auth_header);
        if let Err(e) = &outcome {
            match e {
                AuthorizerError::ConfigurationError(_) => {
                    tracing::error!(kind = e.kind(), error = %e, "Authorizer misconfigured")
                }
                _ => tracing::warn!(kind = e.kind(), error = %e, "Request denied"),
            }
        }

        let decision = build_decision(resource, ctx, &outcome);
        match serde_json::to_string(&decision) {
            Ok(json) => tracing::info!("Authorizer response : {json}"),
            Err(_) => tracing::info!("Authorizer response : {decision:?}"),
        }

        decision
    }

    fn check(&self, auth_header: Option<&str>) -> Result<(), AuthorizerError> {
        let claims = validate_bearer(auth_header, &self.config.verification)?;
        check_issuer(&claims, self.config.allowed_issuer.as_deref())
    }

    /// Lambda entry point.
    pub async fn handle(&self, event: LambdaEvent<AuthorizerRequest>) -> Result<Decision, Error> {
        Ok(self.authorize(&event.payload))
    }
}
