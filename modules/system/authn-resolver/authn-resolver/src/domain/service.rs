//! Credential resolution service.

use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use authn_resolver_sdk::{
    BasicCredential, Credential, IdentityStoreClient, IdentityStoreError, SystemIdentityProvider,
    TokenCredential, scheme_label,
};
use caller_context::{AuthenticatedPrincipal, CallerContext, CallerIdentity};
use tracing::{debug, warn};

use super::error::DomainError;
use crate::config::AuthNResolverConfig;

/// `AuthN` resolver service.
///
/// Classifies a [`Credential`] and dispatches it to the matching strategy:
/// - `Basic`: password check through the identity store
/// - `Token`: user lookup only; the token was verified upstream
/// - `PreAuthenticated`: returned unchanged, no store call
///
/// Store calls run under the system identity, installed into the request's
/// [`CallerContext`] for the duration of the lookup and restored afterwards.
pub struct Service {
    system: Arc<dyn SystemIdentityProvider>,
    store: OnceLock<Arc<dyn IdentityStoreClient>>,
    store_timeout: Duration,
}

impl Service {
    #[must_use]
    pub fn new(system: Arc<dyn SystemIdentityProvider>, cfg: &AuthNResolverConfig) -> Self {
        Self {
            system,
            store: OnceLock::new(),
            store_timeout: Duration::from_millis(cfg.store_timeout_ms),
        }
    }

    /// Wire the identity store. Can be done once.
    ///
    /// # Errors
    ///
    /// `StoreAlreadyWired` if a store was attached before.
    pub fn attach_store(&self, store: Arc<dyn IdentityStoreClient>) -> Result<(), DomainError> {
        self.store
            .set(store)
            .map_err(|_| DomainError::StoreAlreadyWired)
    }

    #[must_use]
    pub fn has_store(&self) -> bool {
        self.store.get().is_some()
    }

    /// Resolve a credential into an authenticated principal.
    ///
    /// `ctx` is left exactly as it was found, whatever the outcome.
    ///
    /// # Errors
    ///
    /// See [`DomainError`]; `LookupFailed` is only produced by the token path.
    #[tracing::instrument(skip_all, fields(kind = credential.kind()))]
    pub async fn resolve(
        &self,
        ctx: &CallerContext,
        credential: Credential,
    ) -> Result<AuthenticatedPrincipal, DomainError> {
        match credential {
            Credential::Basic(basic) => self.authenticate_basic(ctx, &basic).await,
            Credential::Token(token) => self.authenticate_token(ctx, &token).await,
            Credential::PreAuthenticated(principal) => Ok(principal),
            Credential::Unrecognized { scheme } => Err(DomainError::UnsupportedCredentialKind {
                kind: scheme_label(&scheme),
            }),
        }
    }

    async fn authenticate_basic(
        &self,
        ctx: &CallerContext,
        credential: &BasicCredential,
    ) -> Result<AuthenticatedPrincipal, DomainError> {
        let store = self.store()?;
        let _elevated = self.elevate(ctx);

        let user = self
            .bounded(store.authenticate(ctx, &credential.username, &credential.secret, false))
            .await
            .map_err(|e| {
                log_store_rejection("authenticate", &credential.username, &e);
                DomainError::from_basic_store(e)
            })?;

        let authorities = self
            .bounded(store.get_granted_authorities(ctx, user.username()))
            .await
            .map_err(|e| {
                log_store_rejection("get_granted_authorities", user.username(), &e);
                DomainError::from_basic_store(e)
            })?;

        debug!(
            username = %user.username(),
            authorities = authorities.len(),
            "basic credential resolved"
        );
        Ok(AuthenticatedPrincipal::new(user, authorities))
    }

    // Trusts that the token's signature and expiry were checked before the
    // credential was built; only materializes the identity.
    async fn authenticate_token(
        &self,
        ctx: &CallerContext,
        credential: &TokenCredential,
    ) -> Result<AuthenticatedPrincipal, DomainError> {
        let username = credential.username.as_str();
        let store = self.store()?;
        let _elevated = self.elevate(ctx);

        let user = self
            .bounded(store.get_user_by_username(ctx, username))
            .await
            .map_err(|e| {
                log_store_rejection("get_user_by_username", username, &e);
                DomainError::from_token_store(e, username)
            })?;

        let authorities = self
            .bounded(store.get_granted_authorities(ctx, username))
            .await
            .map_err(|e| {
                log_store_rejection("get_granted_authorities", username, &e);
                DomainError::from_token_store(e, username)
            })?;

        debug!(
            username = %user.username(),
            authorities = authorities.len(),
            "token credential resolved"
        );
        Ok(AuthenticatedPrincipal::new(user, authorities))
    }

    fn store(&self) -> Result<&Arc<dyn IdentityStoreClient>, DomainError> {
        self.store.get().ok_or_else(|| {
            tracing::error!("identity store is not wired into authn_resolver");
            DomainError::StoreUnavailable
        })
    }

    fn elevate<'a>(&self, ctx: &'a CallerContext) -> caller_context::ScopedCaller<'a> {
        ctx.impersonate(CallerIdentity::System(self.system.system_principal()))
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, IdentityStoreError>
    where
        F: Future<Output = Result<T, IdentityStoreError>>,
    {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(IdentityStoreError::Unavailable(format!(
                    "no response within {} ms",
                    self.store_timeout.as_millis()
                )))
            })
    }
}

/// Cognitive complexity is inflated by tracing macro expansion.
#[allow(clippy::cognitive_complexity)]
fn log_store_rejection(op: &str, username: &str, e: &IdentityStoreError) {
    match e {
        IdentityStoreError::Unavailable(reason) => {
            warn!(operation = op, %reason, "identity store unavailable");
        }
        IdentityStoreError::AccessDenied { caller } => {
            warn!(operation = op, %caller, "identity store refused the system identity");
        }
        other => {
            debug!(operation = op, %username, error = %other, "identity store rejected lookup");
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use async_trait::async_trait;
    use caller_context::{GrantedAuthority, SystemPrincipal, User};
    use secrecy::{ExposeSecret, SecretString};
    use tracing_test::traced_test;
    use uuid::Uuid;

    use super::*;

    struct System;

    impl SystemIdentityProvider for System {
        fn system_principal(&self) -> SystemPrincipal {
            SystemPrincipal::new("system", Uuid::nil())
        }
    }

    /// Accepts only `alice` / `correct-pw`.
    struct SingleUserStore;

    #[async_trait]
    impl IdentityStoreClient for SingleUserStore {
        async fn authenticate(
            &self,
            _ctx: &CallerContext,
            username: &str,
            secret: &SecretString,
            _update_last_login: bool,
        ) -> Result<User, IdentityStoreError> {
            if username == "alice" && secret.expose_secret() == "correct-pw" {
                Ok(User::builder("alice").build())
            } else {
                Err(IdentityStoreError::InvalidPassword)
            }
        }

        async fn get_user_by_username(
            &self,
            _ctx: &CallerContext,
            _username: &str,
        ) -> Result<User, IdentityStoreError> {
            Err(IdentityStoreError::NotFound)
        }

        async fn get_granted_authorities(
            &self,
            _ctx: &CallerContext,
            _username: &str,
        ) -> Result<Vec<GrantedAuthority>, IdentityStoreError> {
            Ok(vec!["ROLE_USER".into()])
        }
    }

    /// Always unreachable, with connection detail in the error.
    struct DownStore;

    #[async_trait]
    impl IdentityStoreClient for DownStore {
        async fn authenticate(
            &self,
            _ctx: &CallerContext,
            _username: &str,
            _secret: &SecretString,
            _update_last_login: bool,
        ) -> Result<User, IdentityStoreError> {
            Err(IdentityStoreError::Unavailable(
                "pg://admin:db-s3cr3t@10.0.0.5:5432/users refused".to_owned(),
            ))
        }

        async fn get_user_by_username(
            &self,
            _ctx: &CallerContext,
            _username: &str,
        ) -> Result<User, IdentityStoreError> {
            Err(IdentityStoreError::Unavailable("down".to_owned()))
        }

        async fn get_granted_authorities(
            &self,
            _ctx: &CallerContext,
            _username: &str,
        ) -> Result<Vec<GrantedAuthority>, IdentityStoreError> {
            Err(IdentityStoreError::Unavailable("down".to_owned()))
        }
    }

    fn service() -> Service {
        let svc = Service::new(Arc::new(System), &AuthNResolverConfig::default());
        svc.attach_store(Arc::new(SingleUserStore)).unwrap();
        svc
    }

    #[tokio::test]
    #[traced_test]
    async fn rejected_password_is_logged_without_secret() {
        let svc = service();

        let err = svc
            .resolve(
                &CallerContext::new(),
                Credential::basic("alice", "sup3r-s3cret-guess"),
            )
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::InvalidCredentials);
        assert!(logs_contain("identity store rejected lookup"));
        assert!(!logs_contain("sup3r-s3cret-guess"));
    }

    #[tokio::test]
    #[traced_test]
    async fn resolved_principal_is_logged_without_secret() {
        let svc = service();

        let principal = svc
            .resolve(&CallerContext::new(), Credential::basic("alice", "correct-pw"))
            .await
            .unwrap();

        assert_eq!(principal.username(), "alice");
        assert!(logs_contain("basic credential resolved"));
        assert!(!logs_contain("correct-pw"));
    }

    #[tokio::test]
    #[traced_test]
    async fn store_failure_detail_is_logged_not_returned() {
        let svc = Service::new(Arc::new(System), &AuthNResolverConfig::default());
        svc.attach_store(Arc::new(DownStore)).unwrap();

        let err = svc
            .resolve(&CallerContext::new(), Credential::basic("alice", "x"))
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::StoreUnavailable);
        assert!(!err.to_string().contains("db-s3cr3t"));
        assert!(logs_contain("identity store unavailable"));
    }

    #[test]
    fn store_is_reported_unwired_until_attached() {
        let svc = Service::new(Arc::new(System), &AuthNResolverConfig::default());
        assert!(!svc.has_store());
        svc.attach_store(Arc::new(SingleUserStore)).unwrap();
        assert!(svc.has_store());
        assert_eq!(
            svc.attach_store(Arc::new(SingleUserStore)),
            Err(DomainError::StoreAlreadyWired)
        );
    }
}
