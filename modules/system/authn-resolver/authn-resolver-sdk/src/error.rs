//! Error types for the `AuthN` resolver module.

use http::StatusCode;
use thiserror::Error;

/// Errors that can occur when using the `AuthN` resolver API.
///
/// A token naming a user that no longer exists is reported as
/// `InvalidCredentials`, the same as a bad password, so callers cannot
/// probe for account existence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthNResolverError {
    /// No resolution strategy exists for this kind of credential.
    #[error("unsupported credential kind: {kind}")]
    UnsupportedCredentialKind { kind: String },

    /// The identity store is not wired or cannot be reached.
    ///
    /// Carries no store detail; the cause is logged by the resolver.
    #[error("identity store unavailable")]
    StoreUnavailable,

    /// The credential was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Nobody is authenticated in the call context.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The call context holds a caller that is not a resolved user.
    #[error("unexpected principal type: {found}")]
    UnexpectedPrincipalType { found: String },

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthNResolverError {
    /// HTTP status a transport should surface for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::UnexpectedPrincipalType { .. } => StatusCode::FORBIDDEN,
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::UnsupportedCredentialKind { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether this is an expected denial of the caller rather than a service defect.
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::NotAuthenticated | Self::UnexpectedPrincipalType { .. }
        )
    }
}
