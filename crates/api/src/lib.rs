//! Management APIs hosted on the connector's web server.
pub mod auth;
pub mod contract_definition;
pub mod extension;
pub mod observability;

pub use auth::{
    AuthenticationRequestFilter, AuthenticationService, TokenBasedAuthenticationService,
};
pub use extension::{
    api_context_alias, ApiCoreExtension, ContractDefinitionApiExtension, ObservabilityApiExtension,
};
