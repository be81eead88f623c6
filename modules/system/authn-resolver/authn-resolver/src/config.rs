//! Configuration for the `AuthN` resolver.

use secrecy::SecretString;
use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthNResolverConfig {
    /// Upper bound for a single identity store call, in milliseconds.
    pub store_timeout_ms: u64,

    /// Bearer token decoding. When absent, bearer tokens are reported as an
    /// unsupported credential kind.
    pub jwt: Option<JwtConfig>,
}

impl Default for AuthNResolverConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: 5_000,
            jwt: None,
        }
    }
}

/// HS256 bearer token verification settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JwtConfig {
    /// Shared signing secret.
    pub hs256_secret: SecretString,

    /// Clock skew tolerated when checking `exp`, in seconds.
    #[serde(default)]
    pub leeway_secs: u64,
}
