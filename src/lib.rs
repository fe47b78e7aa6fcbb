pub mod authorizer;
pub mod config;
pub mod decision;
pub mod error;
pub mod headers;
pub mod issuer;
pub mod request;
pub mod token;
