//! Wiring of the resolver, the identity store and the listener.

use authn_resolver::AuthNResolver;
use authn_resolver_sdk::AuthNResolverError;
use caller_context::{AuthenticatedPrincipal, CallerContext};
use static_identity_store_plugin::StaticIdentityStorePlugin;
use tenant_management::TenantManagementServer;

use crate::config::AppConfig;

pub struct App {
    resolver: AuthNResolver,
    listener: TenantManagementServer,
}

impl App {
    /// Build the store, then the resolver on the store's system identity,
    /// then wire the two together.
    ///
    /// # Errors
    ///
    /// Fails on invalid static store configuration.
    pub fn build(cfg: &AppConfig) -> anyhow::Result<Self> {
        let store = StaticIdentityStorePlugin::default();
        store.init(&cfg.static_identity_store)?;

        let resolver = AuthNResolver::init(&cfg.authn_resolver, store.system_identity()?);
        resolver.wire_store(store.store()?)?;

        Ok(Self {
            resolver,
            listener: TenantManagementServer::new(cfg.tenant_management.clone()),
        })
    }

    /// Run the listener until Ctrl-C, then stop it.
    ///
    /// # Errors
    ///
    /// Fails if the listener cannot start or exits with an error.
    pub async fn serve(&self) -> anyhow::Result<()> {
        let addr = self.listener.start().await?;
        tracing::info!(%addr, "authn-server ready");

        tokio::signal::ctrl_c().await?;
        tracing::info!("shutdown requested");

        self.listener.stop().await
    }

    /// Resolve one `Authorization` header value on a fresh call context.
    ///
    /// # Errors
    ///
    /// The public resolver error for malformed, rejected or unsupported
    /// credentials.
    pub async fn resolve_header(
        &self,
        authorization: &str,
    ) -> Result<AuthenticatedPrincipal, AuthNResolverError> {
        let credential = self
            .resolver
            .extractor()
            .from_authorization_header(authorization)?;
        self.resolver
            .client()
            .resolve(&CallerContext::new(), credential)
            .await
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_identity_store_plugin::config::UserConfig;

    use super::*;

    fn config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.static_identity_store.users.push(UserConfig {
            username: "alice".to_owned(),
            password_sha256: static_identity_store_plugin::password_sha256_hex("correct-pw"),
            id: None,
            first_name: None,
            last_name: None,
            email: None,
            status: caller_context::AccountStatus::Active,
            authorities: vec!["ROLE_USER".to_owned()],
        });
        cfg
    }

    #[tokio::test]
    async fn basic_header_resolves_end_to_end() {
        let app = App::build(&config()).unwrap();

        // base64("alice:correct-pw")
        let principal = app
            .resolve_header("Basic YWxpY2U6Y29ycmVjdC1wdw==")
            .await
            .unwrap();
        assert_eq!(principal.username(), "alice");
        assert!(principal.has_authority("ROLE_USER"));
    }

    #[tokio::test]
    async fn rejected_and_unsupported_headers_map_to_public_errors() {
        let app = App::build(&config()).unwrap();

        // base64("alice:wrong-pw")
        assert_eq!(
            app.resolve_header("Basic YWxpY2U6d3JvbmctcHc=")
                .await
                .unwrap_err(),
            AuthNResolverError::InvalidCredentials
        );
        assert_eq!(
            app.resolve_header("Basic %%%").await.unwrap_err(),
            AuthNResolverError::InvalidCredentials
        );
        assert!(matches!(
            app.resolve_header("Bearer abc.def.ghi").await.unwrap_err(),
            AuthNResolverError::UnsupportedCredentialKind { .. }
        ));
    }
}
