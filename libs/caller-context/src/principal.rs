use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account state as reported by the identity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Expired,
    Locked,
}

/// User record returned by the identity store.
///
/// Carries no credentials. Built with [`User::builder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: Uuid,
    username: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    #[serde(default)]
    status: AccountStatus,
    last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new `User` builder for the given username.
    #[must_use]
    pub fn builder(username: impl Into<String>) -> UserBuilder {
        UserBuilder {
            username: username.into(),
            ..UserBuilder::default()
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn status(&self) -> AccountStatus {
        self.status
    }

    /// Last successful interactive login, if the store tracks it.
    #[must_use]
    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    /// Return a copy with `last_login` replaced.
    #[must_use]
    pub fn with_last_login(mut self, at: DateTime<Utc>) -> Self {
        self.last_login = Some(at);
        self
    }
}

#[derive(Default)]
pub struct UserBuilder {
    id: Option<Uuid>,
    username: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    status: AccountStatus,
    last_login: Option<DateTime<Utc>>,
}

impl UserBuilder {
    #[must_use]
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn first_name(mut self, first_name: &str) -> Self {
        self.first_name = Some(first_name.to_owned());
        self
    }

    #[must_use]
    pub fn last_name(mut self, last_name: &str) -> Self {
        self.last_name = Some(last_name.to_owned());
        self
    }

    #[must_use]
    pub fn email(mut self, email: &str) -> Self {
        self.email = Some(email.to_owned());
        self
    }

    #[must_use]
    pub fn status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn last_login(mut self, at: DateTime<Utc>) -> Self {
        self.last_login = Some(at);
        self
    }

    /// Build the user. A random id is assigned when none was given.
    #[must_use]
    pub fn build(self) -> User {
        User {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            status: self.status,
            last_login: self.last_login,
        }
    }
}

/// Opaque permission or role identifier attached to a principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantedAuthority(String);

impl GrantedAuthority {
    #[must_use]
    pub fn new(authority: impl Into<String>) -> Self {
        Self(authority.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GrantedAuthority {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for GrantedAuthority {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for GrantedAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved end-user identity together with its granted authorities.
///
/// Authorities keep the order in which the identity store returned them.
/// The value is immutable; resolving a new credential yields a new principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedPrincipal {
    user: User,
    authorities: Vec<GrantedAuthority>,
}

impl AuthenticatedPrincipal {
    #[must_use]
    pub fn new(user: User, authorities: Vec<GrantedAuthority>) -> Self {
        Self { user, authorities }
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn username(&self) -> &str {
        self.user.username()
    }

    #[must_use]
    pub fn authorities(&self) -> &[GrantedAuthority] {
        &self.authorities
    }

    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a.as_str() == authority)
    }

    #[must_use]
    pub fn into_user(self) -> User {
        self.user
    }
}

/// The platform's own, non-interactive identity.
///
/// Used only to perform privileged identity-store lookups on behalf of a
/// request. Constant for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPrincipal {
    name: String,
    tenant_id: Uuid,
}

impl SystemPrincipal {
    #[must_use]
    pub fn new(name: impl Into<String>, tenant_id: Uuid) -> Self {
        Self {
            name: name.into(),
            tenant_id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn user_builder_full() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();
        let user = User::builder("alice")
            .id(id)
            .first_name("Alice")
            .last_name("Liddell")
            .email("alice@example.com")
            .status(AccountStatus::Locked)
            .build();

        assert_eq!(user.id(), id);
        assert_eq!(user.username(), "alice");
        assert_eq!(user.first_name(), Some("Alice"));
        assert_eq!(user.last_name(), Some("Liddell"));
        assert_eq!(user.email(), Some("alice@example.com"));
        assert_eq!(user.status(), AccountStatus::Locked);
        assert!(user.last_login().is_none());
    }

    #[test]
    fn user_builder_minimal_defaults_to_active() {
        let user = User::builder("bob").build();

        assert_eq!(user.username(), "bob");
        assert_eq!(user.status(), AccountStatus::Active);
        assert!(user.email().is_none());
    }

    #[test]
    fn principal_keeps_authority_order() {
        let principal = AuthenticatedPrincipal::new(
            User::builder("alice").build(),
            vec!["ROLE_USER".into(), "ROLE_ADMIN".into(), "ROLE_AUDITOR".into()],
        );

        let names: Vec<&str> = principal
            .authorities()
            .iter()
            .map(GrantedAuthority::as_str)
            .collect();
        assert_eq!(names, ["ROLE_USER", "ROLE_ADMIN", "ROLE_AUDITOR"]);
        assert!(principal.has_authority("ROLE_ADMIN"));
        assert!(!principal.has_authority("ROLE_ROOT"));
    }

    #[test]
    fn authority_serializes_as_plain_string() {
        let json = serde_json::to_string(&GrantedAuthority::new("ROLE_USER")).unwrap();
        assert_eq!(json, "\"ROLE_USER\"");
    }

    #[test]
    fn account_status_uses_snake_case() {
        let status: AccountStatus = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(status, AccountStatus::Expired);
    }
}
