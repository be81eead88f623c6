//! Local (in-process) client for the `AuthN` resolver.

use std::sync::Arc;

use async_trait::async_trait;
use authn_resolver_sdk::{AuthNResolverClient, AuthNResolverError, Credential};
use caller_context::{AuthenticatedPrincipal, CallerContext, User};

use super::{DomainError, Service, current_user};

/// Local client wrapping the service.
pub struct AuthNResolverLocalClient {
    svc: Arc<Service>,
}

impl AuthNResolverLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

/// Log at a level matching the failure class, then convert.
///
/// Denials are routine and logged at `debug`; wiring defects at `error`.
#[allow(clippy::cognitive_complexity)]
fn log_and_convert(op: &str, e: DomainError) -> AuthNResolverError {
    match &e {
        DomainError::InvalidCredentials
        | DomainError::LookupFailed { .. }
        | DomainError::MalformedCredential(_)
        | DomainError::NotAuthenticated
        | DomainError::UnexpectedPrincipalType { .. } => {
            tracing::debug!(operation = op, error = %e, "authn_resolver denied request");
        }
        DomainError::UnsupportedCredentialKind { .. }
        | DomainError::StoreUnavailable
        | DomainError::StoreAlreadyWired => {
            tracing::error!(operation = op, error = %e, "authn_resolver call failed");
        }
    }
    e.into()
}

#[async_trait]
impl AuthNResolverClient for AuthNResolverLocalClient {
    async fn resolve(
        &self,
        ctx: &CallerContext,
        credential: Credential,
    ) -> Result<AuthenticatedPrincipal, AuthNResolverError> {
        self.svc
            .resolve(ctx, credential)
            .await
            .map_err(|e| log_and_convert("resolve", e))
    }

    async fn current_user(&self, ctx: &CallerContext) -> Result<User, AuthNResolverError> {
        current_user(ctx).map_err(|e| log_and_convert("current_user", e))
    }
}
