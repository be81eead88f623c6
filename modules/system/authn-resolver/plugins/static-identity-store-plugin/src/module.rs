//! Static identity store plugin module.

use std::sync::{Arc, OnceLock};

use authn_resolver_sdk::{IdentityStoreClient, SystemIdentityProvider};
use tracing::info;

use crate::config::StaticIdentityStoreConfig;
use crate::domain::Service;

/// Static identity store plugin module.
///
/// Provides users, authorities and the system identity from configuration.
/// The same service backs both the identity store and the system identity
/// provider, so only the configured system principal is allowed to query it.
pub struct StaticIdentityStorePlugin {
    service: OnceLock<Arc<Service>>,
}

impl Default for StaticIdentityStorePlugin {
    fn default() -> Self {
        Self {
            service: OnceLock::new(),
        }
    }
}

impl StaticIdentityStorePlugin {
    /// Build the store from configuration.
    ///
    /// # Errors
    ///
    /// Fails on invalid user entries or when called twice.
    pub fn init(&self, cfg: &StaticIdentityStoreConfig) -> anyhow::Result<()> {
        info!("Initializing static_identity_store_plugin");
        if cfg.users.is_empty() {
            tracing::warn!(
                "Static identity store has no users configured; every credential will be rejected"
            );
        }

        let service = Arc::new(Service::from_config(cfg)?);
        info!(
            system_identity = %service.system().name(),
            user_count = service.user_count(),
            "Loaded plugin configuration"
        );

        self.service
            .set(service)
            .map_err(|_| anyhow::anyhow!("Service already initialized"))?;
        Ok(())
    }

    /// The store, as consumed by the `AuthN` resolver.
    ///
    /// # Errors
    ///
    /// Fails before [`init`](Self::init).
    pub fn store(&self) -> anyhow::Result<Arc<dyn IdentityStoreClient>> {
        let service = self.service()?;
        Ok(service)
    }

    /// The system identity provider backed by the same configuration.
    ///
    /// # Errors
    ///
    /// Fails before [`init`](Self::init).
    pub fn system_identity(&self) -> anyhow::Result<Arc<dyn SystemIdentityProvider>> {
        let service = self.service()?;
        Ok(service)
    }

    fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .get()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("static identity store is not initialized"))
    }
}
