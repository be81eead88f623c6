//! Accessor for the user currently installed in a call context.

use caller_context::{CallerContext, CallerIdentity, User};

use super::error::DomainError;

/// Return the user of the principal installed in `ctx`.
///
/// Only [`CallerIdentity::User`] values written after a successful
/// resolution are accepted. The system identity and identities written by
/// other providers are rejected.
///
/// # Errors
///
/// - `NotAuthenticated` when `ctx` is empty
/// - `UnexpectedPrincipalType` when `ctx` holds any other kind of caller
pub fn current_user(ctx: &CallerContext) -> Result<User, DomainError> {
    match ctx.get() {
        None => Err(DomainError::NotAuthenticated),
        Some(CallerIdentity::User(principal)) => Ok(principal.into_user()),
        Some(other) => Err(DomainError::UnexpectedPrincipalType {
            found: other.kind().to_owned(),
        }),
    }
}
