//! Source of the platform's system identity.

use caller_context::SystemPrincipal;

/// Supplies the pre-trusted identity used for privileged store lookups.
///
/// Implementations return the same principal for the whole process lifetime
/// and must be safe to call concurrently.
pub trait SystemIdentityProvider: Send + Sync {
    fn system_principal(&self) -> SystemPrincipal;
}
