//! Client implementation for the static identity store plugin.
//!
//! Implements `IdentityStoreClient` and `SystemIdentityProvider` using the
//! domain service.

use async_trait::async_trait;
use authn_resolver_sdk::{IdentityStoreClient, IdentityStoreError, SystemIdentityProvider};
use caller_context::{CallerContext, GrantedAuthority, SystemPrincipal, User};
use secrecy::{ExposeSecret, SecretString};

use super::service::Service;

#[async_trait]
impl IdentityStoreClient for Service {
    async fn authenticate(
        &self,
        ctx: &CallerContext,
        username: &str,
        secret: &SecretString,
        update_last_login: bool,
    ) -> Result<User, IdentityStoreError> {
        Service::authenticate(self, ctx, username, secret.expose_secret(), update_last_login)
    }

    async fn get_user_by_username(
        &self,
        ctx: &CallerContext,
        username: &str,
    ) -> Result<User, IdentityStoreError> {
        Service::get_user_by_username(self, ctx, username)
    }

    async fn get_granted_authorities(
        &self,
        ctx: &CallerContext,
        username: &str,
    ) -> Result<Vec<GrantedAuthority>, IdentityStoreError> {
        Service::get_granted_authorities(self, ctx, username)
    }
}

impl SystemIdentityProvider for Service {
    fn system_principal(&self) -> SystemPrincipal {
        self.system().clone()
    }
}
