use serde::Deserialize;

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TenantManagementConfig {
    /// Address to bind, `host:port`. Port `0` picks a free port.
    pub bind_addr: String,

    /// How long `stop` waits for open connections to drain before aborting
    /// the serve loop, in milliseconds.
    pub shutdown_timeout_ms: u64,
}

impl Default for TenantManagementConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9091".to_owned(),
            shutdown_timeout_ms: 5_000,
        }
    }
}
