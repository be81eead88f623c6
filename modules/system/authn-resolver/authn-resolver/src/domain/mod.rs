//! Domain layer for the `AuthN` resolver.

pub mod credentials;
pub mod current_user;
pub mod error;
pub mod local_client;
pub mod service;

pub use credentials::{CredentialExtractor, JwtClaimsDecoder, TokenClaims, TokenClaimsDecoder};
pub use current_user::current_user;
pub use error::DomainError;
pub use local_client::AuthNResolverLocalClient;
pub use service::Service;
