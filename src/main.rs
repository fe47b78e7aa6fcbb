use std::sync::Arc;

use lambda_http::{lambda_runtime, service_fn, tracing, Error};
use token_authorizer::{authorizer::Authorizer, config::AuthorizerConfig};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let authorizer = Arc::new(Authorizer::new(AuthorizerConfig::from_env()?));

    lambda_runtime::run(service_fn(move |event| {
        let authorizer = Arc::clone(&authorizer);
        async move { authorizer.handle(event).await }
    }))
    .await
}
