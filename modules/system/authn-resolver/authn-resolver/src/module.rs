//! `AuthN` resolver module wiring.

use std::sync::Arc;

use authn_resolver_sdk::{AuthNResolverClient, IdentityStoreClient, SystemIdentityProvider};
use tracing::info;

use crate::config::AuthNResolverConfig;
use crate::domain::{AuthNResolverLocalClient, CredentialExtractor, JwtClaimsDecoder, Service};

/// `AuthN` Resolver module.
///
/// This module:
/// 1. Builds the resolution service from configuration
/// 2. Exposes it to consumers as an [`AuthNResolverClient`]
/// 3. Builds the `Authorization` header extractor (with bearer support when
///    a JWT secret is configured)
///
/// The identity store is wired separately with [`AuthNResolver::wire_store`];
/// until then every store-backed resolution fails with `StoreUnavailable`.
pub struct AuthNResolver {
    service: Arc<Service>,
    client: Arc<dyn AuthNResolverClient>,
    extractor: CredentialExtractor,
}

impl AuthNResolver {
    #[must_use]
    #[tracing::instrument(skip_all, fields(store_timeout_ms = cfg.store_timeout_ms))]
    pub fn init(cfg: &AuthNResolverConfig, system: Arc<dyn SystemIdentityProvider>) -> Self {
        let system_name = system.system_principal().name().to_owned();
        let service = Arc::new(Service::new(system, cfg));
        let client: Arc<dyn AuthNResolverClient> =
            Arc::new(AuthNResolverLocalClient::new(service.clone()));

        let extractor = match &cfg.jwt {
            Some(jwt) => {
                CredentialExtractor::with_decoder(Arc::new(JwtClaimsDecoder::from_config(jwt)))
            }
            None => CredentialExtractor::basic_only(),
        };

        info!(
            system_identity = %system_name,
            bearer_tokens = extractor.accepts_tokens(),
            "Initialized authn_resolver"
        );

        Self {
            service,
            client,
            extractor,
        }
    }

    /// Attach the identity store used for all store-backed resolutions.
    ///
    /// # Errors
    ///
    /// Fails if a store is already wired.
    pub fn wire_store(&self, store: Arc<dyn IdentityStoreClient>) -> anyhow::Result<()> {
        self.service.attach_store(store)?;
        info!("Identity store wired into authn_resolver");
        Ok(())
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn AuthNResolverClient> {
        self.client.clone()
    }

    #[must_use]
    pub fn extractor(&self) -> &CredentialExtractor {
        &self.extractor
    }
}
