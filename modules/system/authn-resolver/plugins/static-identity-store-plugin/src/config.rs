//! Configuration for the static identity store plugin.

use caller_context::AccountStatus;
use serde::Deserialize;
use uuid::Uuid;

/// Tenant the system identity belongs to when none is configured.
pub const DEFAULT_SYSTEM_TENANT_ID: Uuid =
    Uuid::from_u128(0x0000_0000_df51_5b42_9538_d2b5_6b7e_e953);

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticIdentityStoreConfig {
    /// Identity used for privileged lookups.
    pub system: SystemIdentityConfig,

    /// Users known to the store.
    pub users: Vec<UserConfig>,
}

/// System identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemIdentityConfig {
    pub name: String,
    pub tenant_id: Uuid,
}

impl Default for SystemIdentityConfig {
    fn default() -> Self {
        Self {
            name: "system".to_owned(),
            tenant_id: DEFAULT_SYSTEM_TENANT_ID,
        }
    }
}

/// A single user entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub username: String,

    /// Hex-encoded SHA-256 digest of the password.
    pub password_sha256: String,

    /// Stable user id. Generated at startup when omitted.
    #[serde(default)]
    pub id: Option<Uuid>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub status: AccountStatus,

    /// Granted authorities, in the order they are reported.
    #[serde(default)]
    pub authorities: Vec<String>,
}
