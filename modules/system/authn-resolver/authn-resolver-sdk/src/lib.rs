//! `AuthN` Resolver SDK
//!
//! This crate provides the public API for the `authn_resolver` module:
//!
//! - [`AuthNResolverClient`] - Public API trait for consumers
//! - [`Credential`] - Credential presentation model
//! - [`IdentityStoreClient`] - Contract the resolver consumes to look users up
//! - [`SystemIdentityProvider`] - Source of the privileged system identity
//! - [`AuthNResolverError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use authn_resolver_sdk::{AuthNResolverClient, Credential};
//! use caller_context::{CallerContext, CallerIdentity};
//!
//! let ctx = CallerContext::new();
//! let principal = authn.resolve(&ctx, Credential::basic("alice", "secret")).await?;
//!
//! // The caller decides when the principal becomes the ambient identity.
//! ctx.set(Some(CallerIdentity::User(principal)));
//! let me = authn.current_user(&ctx).await?;
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod store_api;
pub mod system_identity;

// Re-export main types at crate root
pub use api::AuthNResolverClient;
pub use error::AuthNResolverError;
pub use models::{BasicCredential, Credential, TokenCredential, scheme_label};
pub use store_api::{IdentityStoreClient, IdentityStoreError};
pub use system_identity::SystemIdentityProvider;
