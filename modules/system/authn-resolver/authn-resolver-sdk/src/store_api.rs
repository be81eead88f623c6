//! Identity store contract consumed by the `AuthN` resolver.
//!
//! Store implementations (plugins) own user lookup, password verification
//! and authority assignment. The resolver only calls them.

use async_trait::async_trait;
use caller_context::{CallerContext, GrantedAuthority, User};
use secrecy::SecretString;
use thiserror::Error;

/// Errors reported by an identity store.
///
/// These never reach resolver consumers verbatim; the resolver reclassifies
/// them into [`AuthNResolverError`](crate::AuthNResolverError).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityStoreError {
    #[error("user not found")]
    NotFound,

    #[error("password mismatch")]
    InvalidPassword,

    #[error("account is locked or expired")]
    AccountLocked,

    /// The current caller of the context may not perform this operation.
    #[error("access denied for caller '{caller}'")]
    AccessDenied { caller: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("internal store error: {0}")]
    Internal(String),
}

/// Identity store contract.
///
/// Every operation receives the [`CallerContext`] it runs in. Stores are
/// expected to check the context's current caller, so the resolver must
/// install the system identity before calling them.
#[async_trait]
pub trait IdentityStoreClient: Send + Sync {
    /// Verify `secret` for `username` and return the user.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidPassword` or `AccountLocked` when the credential is
    /// rejected; `AccessDenied` when the context's caller is not privileged.
    async fn authenticate(
        &self,
        ctx: &CallerContext,
        username: &str,
        secret: &SecretString,
        update_last_login: bool,
    ) -> Result<User, IdentityStoreError>;

    /// Look a user up by username without checking any secret.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such user exists.
    async fn get_user_by_username(
        &self,
        ctx: &CallerContext,
        username: &str,
    ) -> Result<User, IdentityStoreError>;

    /// Authorities granted to `username`, in the store's order.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such user exists.
    async fn get_granted_authorities(
        &self,
        ctx: &CallerContext,
        username: &str,
    ) -> Result<Vec<GrantedAuthority>, IdentityStoreError>;
}
