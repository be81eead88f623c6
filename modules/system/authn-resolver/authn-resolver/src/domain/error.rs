//! Domain errors for the `AuthN` resolver.

use authn_resolver_sdk::{AuthNResolverError, IdentityStoreError};

/// Internal domain errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unsupported credential kind: {kind}")]
    UnsupportedCredentialKind { kind: String },

    #[error("identity store unavailable")]
    StoreUnavailable,

    #[error("identity store is already wired")]
    StoreAlreadyWired,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token subject '{username}' could not be looked up")]
    LookupFailed { username: String },

    #[error("malformed credential: {0}")]
    MalformedCredential(String),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("unexpected principal type: {found}")]
    UnexpectedPrincipalType { found: String },
}

impl DomainError {
    /// Classify a store failure on the username/password path.
    pub(crate) fn from_basic_store(e: IdentityStoreError) -> Self {
        match e {
            IdentityStoreError::Unavailable(_) => Self::StoreUnavailable,
            IdentityStoreError::NotFound
            | IdentityStoreError::InvalidPassword
            | IdentityStoreError::AccountLocked
            | IdentityStoreError::AccessDenied { .. }
            | IdentityStoreError::Internal(_) => Self::InvalidCredentials,
        }
    }

    /// Classify a store failure on the token path.
    pub(crate) fn from_token_store(e: IdentityStoreError, username: &str) -> Self {
        match e {
            IdentityStoreError::Unavailable(_) => Self::StoreUnavailable,
            IdentityStoreError::NotFound
            | IdentityStoreError::InvalidPassword
            | IdentityStoreError::AccountLocked
            | IdentityStoreError::AccessDenied { .. }
            | IdentityStoreError::Internal(_) => Self::LookupFailed {
                username: username.to_owned(),
            },
        }
    }
}

impl From<DomainError> for AuthNResolverError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::UnsupportedCredentialKind { kind } => {
                Self::UnsupportedCredentialKind { kind }
            }
            DomainError::StoreUnavailable => Self::StoreUnavailable,
            // A vanished token subject must look exactly like a bad password.
            DomainError::InvalidCredentials
            | DomainError::LookupFailed { .. }
            | DomainError::MalformedCredential(_) => Self::InvalidCredentials,
            DomainError::NotAuthenticated => Self::NotAuthenticated,
            DomainError::UnexpectedPrincipalType { found } => {
                Self::UnexpectedPrincipalType { found }
            }
            DomainError::StoreAlreadyWired => {
                Self::Internal("identity store is already wired".to_owned())
            }
        }
    }
}
