//! `AuthN` Resolver Module
//!
//! Turns presented credentials into authenticated principals:
//! classifies the credential, looks the user up in the identity store under
//! the system identity, and assembles the principal with its authorities.
//!
//! Provides the `AuthNResolverClient` implementation consumed by the rest of
//! the platform.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use config::{AuthNResolverConfig, JwtConfig};
pub use domain::{CredentialExtractor, DomainError, Service};
pub use module::AuthNResolver;
