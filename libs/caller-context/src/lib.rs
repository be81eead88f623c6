#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Per-call authentication context.
//!
//! - [`CallerContext`] - current-caller storage for one logical call context
//! - [`ScopedCaller`] - guard that temporarily installs another caller
//! - [`AuthenticatedPrincipal`], [`User`], [`GrantedAuthority`] - resolved identities
//! - [`SystemPrincipal`] - the platform's own identity used for privileged lookups
pub mod context;
pub mod principal;

pub use context::{CallerContext, CallerIdentity, ScopedCaller};
pub use principal::{
    AccountStatus, AuthenticatedPrincipal, GrantedAuthority, SystemPrincipal, User, UserBuilder,
};
