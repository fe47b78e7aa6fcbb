use serde::Serialize;

use crate::error::AuthorizerError;
use crate::request::RequestContext;

pub const SUCCESS_MESSAGE: &str = "SUCCESS";
const POLICY_VERSION: &str = "2012-10-17";
const INVOKE_ACTION: &str = "execute-api:Invoke";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    #[serde(rename = "Action")]
    action: &'static str,
    #[serde(rename = "Effect")]
    pub effect: Effect,
    #[serde(rename = "Resource")]
    pub resource: String,
}

/// Always holds exactly one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    version: &'static str,
    #[serde(rename = "Statement")]
    statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionContext {
    pub message: String,
}

/// The authorizer response handed back to API Gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    pub context: DecisionContext,
}

impl Decision {
    /// Effect of the single policy statement.
    pub fn effect(&self) -> Effect {
        self.policy_document.statements[0].effect
    }

    pub fn resource(&self) -> &str {
        &self.policy_document.statements[0].resource
    }

    pub fn message(&self) -> &str {
        &self.context.message
    }
}

/// Resource ARN the decision is scoped to: every resource path for the
/// caller's stage and method.
pub fn resource_arn(region: &str, ctx: &RequestContext) -> String {
    format!(
        "arn:aws:execute-api:{region}:{}:{}/{}/{}/*",
        ctx.account_id, ctx.api_id, ctx.stage, ctx.http_method
    )
}

/// Turn the pipeline outcome into a policy for `resource`.
pub fn build_decision(
    resource: String,
    ctx: &RequestContext,
    outcome: &Result<(), AuthorizerError>,
) -> Decision {
    let (effect, message) = match outcome {
        Ok(()) => (Effect::Allow, SUCCESS_MESSAGE.to_string()),
        Err(e) => (Effect::Deny, e.to_string()),
    };

    Decision {
        principal_id: ctx.account_id.clone(),
        policy_document: PolicyDocument {
            version: POLICY_VERSION,
            statements: vec![Statement {
                action: INVOKE_ACTION,
                effect,
                resource,
            }],
        },
        context: DecisionContext { message },
    }
}
