use std::collections::HashMap;

use serde::Deserialize;

/// The parts of an API Gateway REQUEST authorizer event the pipeline reads.
///
/// Any other event fields are ignored. Headers may be `null` or missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequest {
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub request_context: RequestContext,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    pub account_id: String,
    pub api_id: String,
    pub stage: String,
    pub http_method: String,
}
