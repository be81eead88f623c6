#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Tenant-management listener.
//!
//! A network listener with an explicit lifecycle: [`TenantManagementServer::start`],
//! [`TenantManagementServer::stop`] and [`TenantManagementServer::is_running`].
//! It shares no state with the `AuthN` resolver and can be started and
//! stopped independently of it.

pub mod config;
pub mod server;
mod web;

pub use config::TenantManagementConfig;
pub use server::TenantManagementServer;
