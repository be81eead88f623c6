#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Identity Store Plugin
//!
//! Identity store with users and authorities taken from configuration, for
//! development and testing. Also supplies the system identity the `AuthN`
//! resolver impersonates during lookups.
//!
//! ## Configuration
//!
//! ```yaml
//! static_identity_store:
//!   system:
//!     name: "system"
//!     tenant_id: "00000000-df51-5b42-9538-d2b56b7ee953"
//!   users:
//!     - username: "admin"
//!       # sha256("password")
//!       password_sha256: "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
//!       authorities: ["ROLE_ADMIN", "ROLE_USER"]
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use domain::password_sha256_hex;
pub use module::StaticIdentityStorePlugin;
