//! Public API trait for the `AuthN` resolver.
//!
//! This trait defines the interface that consumers use to turn a presented
//! credential into an authenticated principal.

use async_trait::async_trait;
use caller_context::{AuthenticatedPrincipal, CallerContext, User};

use crate::error::AuthNResolverError;
use crate::models::Credential;

/// Public API trait for the `AuthN` resolver.
///
/// # Ambient caller
///
/// `resolve` temporarily replaces the current caller of `ctx` with the
/// system identity while it talks to the identity store. When it returns,
/// `ctx` holds exactly what it held before the call. The resolved principal
/// is handed back to the caller; it is never installed into `ctx` here.
#[async_trait]
pub trait AuthNResolverClient: Send + Sync {
    /// Validate `credential` and return the principal with its authorities.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` if the store rejects the credential or the
    ///   identified user no longer exists
    /// - `StoreUnavailable` if no identity store is wired or it cannot be reached
    /// - `UnsupportedCredentialKind` for credential kinds with no strategy
    async fn resolve(
        &self,
        ctx: &CallerContext,
        credential: Credential,
    ) -> Result<AuthenticatedPrincipal, AuthNResolverError>;

    /// Return the user of the principal currently installed in `ctx`.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` if nobody is installed
    /// - `UnexpectedPrincipalType` if the installed caller is not a resolved user
    async fn current_user(&self, ctx: &CallerContext) -> Result<User, AuthNResolverError>;
}
