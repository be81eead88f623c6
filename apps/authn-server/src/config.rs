//! Layered application configuration.

use std::path::Path;

use authn_resolver::AuthNResolverConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;
use static_identity_store_plugin::config::StaticIdentityStoreConfig;
use tenant_management::TenantManagementConfig;

/// Prefix of environment overrides; `__` separates nested keys.
pub const ENV_PREFIX: &str = "AUTHN__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub authn_resolver: AuthNResolverConfig,
    pub static_identity_store: StaticIdentityStoreConfig,
    pub tenant_management: TenantManagementConfig,
}

impl AppConfig {
    /// Load defaults, then the YAML file (if any), then `AUTHN__*` env vars.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or any layer does not match the schema.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file() {
        let cfg = AppConfig::load(None).unwrap();
        assert_eq!(cfg.tenant_management.bind_addr, "127.0.0.1:9091");
        assert!(cfg.static_identity_store.users.is_empty());
    }

    #[test]
    fn yaml_sections_are_loaded() {
        let file = write_yaml(
            r#"
authn_resolver:
  store_timeout_ms: 750
  jwt:
    hs256_secret: "dev-signing-key"
static_identity_store:
  system:
    name: "platform"
  users:
    - username: "alice"
      password_sha256: "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
      authorities: ["ROLE_USER"]
tenant_management:
  bind_addr: "127.0.0.1:0"
"#,
        );

        let cfg = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.authn_resolver.store_timeout_ms, 750);
        assert!(cfg.authn_resolver.jwt.is_some());
        assert_eq!(cfg.static_identity_store.system.name, "platform");
        assert_eq!(cfg.static_identity_store.users[0].authorities, ["ROLE_USER"]);
        assert_eq!(cfg.tenant_management.bind_addr, "127.0.0.1:0");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_yaml("authn_resolver:\n  update_last_login: true\n");
        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.yaml"))).is_err());
    }
}
