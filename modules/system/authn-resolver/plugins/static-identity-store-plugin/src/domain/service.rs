//! Service implementation for the static identity store plugin.

use std::collections::HashMap;

use anyhow::{Context as _, bail};
use authn_resolver_sdk::IdentityStoreError;
use caller_context::{
    AccountStatus, CallerContext, CallerIdentity, GrantedAuthority, SystemPrincipal, User,
};
use chrono::Utc;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use crate::config::{StaticIdentityStoreConfig, UserConfig};

struct UserEntry {
    user: User,
    password_digest: [u8; 32],
    authorities: Vec<GrantedAuthority>,
}

impl UserEntry {
    fn check(&self, presented: &[u8; 32]) -> Result<(), IdentityStoreError> {
        if !digest_matches(&self.password_digest, presented) {
            return Err(IdentityStoreError::InvalidPassword);
        }
        if self.user.status() != AccountStatus::Active {
            return Err(IdentityStoreError::AccountLocked);
        }
        Ok(())
    }
}

/// Static identity store.
///
/// Users, password digests and authorities come from configuration. Every
/// operation requires the calling context to run under the system identity.
pub struct Service {
    system: SystemPrincipal,
    users: RwLock<HashMap<String, UserEntry>>,
}

impl Service {
    /// Create a service from plugin configuration.
    ///
    /// # Errors
    ///
    /// Fails on duplicate usernames or malformed password digests.
    pub fn from_config(cfg: &StaticIdentityStoreConfig) -> anyhow::Result<Self> {
        let mut users = HashMap::with_capacity(cfg.users.len());
        for user_cfg in &cfg.users {
            let entry = build_entry(user_cfg)?;
            if users.insert(user_cfg.username.clone(), entry).is_some() {
                bail!("duplicate user '{}' in identity store config", user_cfg.username);
            }
        }

        Ok(Self {
            system: SystemPrincipal::new(cfg.system.name.clone(), cfg.system.tenant_id),
            users: RwLock::new(users),
        })
    }

    #[must_use]
    pub fn system(&self) -> &SystemPrincipal {
        &self.system
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.read().len()
    }

    /// Verify a password and return the user.
    ///
    /// # Errors
    ///
    /// `AccessDenied`, `NotFound`, `InvalidPassword` or `AccountLocked`.
    pub fn authenticate(
        &self,
        ctx: &CallerContext,
        username: &str,
        password: &str,
        update_last_login: bool,
    ) -> Result<User, IdentityStoreError> {
        self.require_system(ctx)?;

        // Hashed before the lookup so unknown users cost the same as known ones.
        let presented = password_digest(password);

        if update_last_login {
            let mut users = self.users.write();
            let entry = users.get_mut(username).ok_or(IdentityStoreError::NotFound)?;
            entry.check(&presented)?;
            entry.user = entry.user.clone().with_last_login(Utc::now());
            return Ok(entry.user.clone());
        }

        let users = self.users.read();
        let entry = users.get(username).ok_or(IdentityStoreError::NotFound)?;
        entry.check(&presented)?;
        Ok(entry.user.clone())
    }

    /// # Errors
    ///
    /// `AccessDenied` or `NotFound`.
    pub fn get_user_by_username(
        &self,
        ctx: &CallerContext,
        username: &str,
    ) -> Result<User, IdentityStoreError> {
        self.require_system(ctx)?;
        self.users
            .read()
            .get(username)
            .map(|e| e.user.clone())
            .ok_or(IdentityStoreError::NotFound)
    }

    /// # Errors
    ///
    /// `AccessDenied` or `NotFound`.
    pub fn get_granted_authorities(
        &self,
        ctx: &CallerContext,
        username: &str,
    ) -> Result<Vec<GrantedAuthority>, IdentityStoreError> {
        self.require_system(ctx)?;
        self.users
            .read()
            .get(username)
            .map(|e| e.authorities.clone())
            .ok_or(IdentityStoreError::NotFound)
    }

    fn require_system(&self, ctx: &CallerContext) -> Result<(), IdentityStoreError> {
        match ctx.get() {
            Some(CallerIdentity::System(principal)) if principal == self.system => Ok(()),
            other => {
                let caller = other.map_or("anonymous", |c| c.kind()).to_owned();
                tracing::debug!(%caller, "static identity store refused unprivileged caller");
                Err(IdentityStoreError::AccessDenied { caller })
            }
        }
    }
}

fn build_entry(cfg: &UserConfig) -> anyhow::Result<UserEntry> {
    let raw = hex::decode(cfg.password_sha256.trim())
        .with_context(|| format!("password_sha256 of user '{}' is not hex", cfg.username))?;
    let password_digest: [u8; 32] = raw.try_into().map_err(|_| {
        anyhow::anyhow!(
            "password_sha256 of user '{}' is not a SHA-256 digest",
            cfg.username
        )
    })?;

    let mut builder = User::builder(cfg.username.as_str()).status(cfg.status);
    if let Some(id) = cfg.id {
        builder = builder.id(id);
    }
    if let Some(first_name) = &cfg.first_name {
        builder = builder.first_name(first_name);
    }
    if let Some(last_name) = &cfg.last_name {
        builder = builder.last_name(last_name);
    }
    if let Some(email) = &cfg.email {
        builder = builder.email(email);
    }

    Ok(UserEntry {
        user: builder.build(),
        password_digest,
        authorities: cfg
            .authorities
            .iter()
            .map(|a| GrantedAuthority::new(a.as_str()))
            .collect(),
    })
}

fn password_digest(password: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(password.as_bytes()));
    out
}

/// Hex-encoded SHA-256 digest of `password`, as stored in `password_sha256`.
#[must_use]
pub fn password_sha256_hex(password: &str) -> String {
    hex::encode(password_digest(password))
}

fn digest_matches(expected: &[u8; 32], actual: &[u8; 32]) -> bool {
    expected
        .iter()
        .zip(actual.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
