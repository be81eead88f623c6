//! Credential presentation models for the `AuthN` resolver module.

use caller_context::AuthenticatedPrincipal;
use secrecy::SecretString;

/// Longest scheme name kept verbatim in [`Credential::Unrecognized`].
pub const MAX_SCHEME_LEN: usize = 20;

/// Label used when a presentation carries nothing that looks like a scheme.
pub const UNKNOWN_SCHEME: &str = "unknown";

/// One attempt to prove identity.
///
/// Produced by transport-level decoding and consumed by a single call to
/// [`AuthNResolverClient::resolve`](crate::AuthNResolverClient::resolve).
/// Secrets are held as [`SecretString`], so `Debug` output is redacted.
#[derive(Debug, Clone)]
pub enum Credential {
    /// Username and password.
    Basic(BasicCredential),
    /// Claims of a token whose signature and expiry were already verified upstream.
    Token(TokenCredential),
    /// A principal resolved earlier; passed through without a store call.
    PreAuthenticated(AuthenticatedPrincipal),
    /// A presentation no strategy understands, e.g. an unknown `Authorization` scheme.
    Unrecognized { scheme: String },
}

impl Credential {
    /// Build a username/password credential.
    #[must_use]
    pub fn basic(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::Basic(BasicCredential {
            username: username.into(),
            secret: SecretString::from(secret.into()),
        })
    }

    /// Build a token credential for the subject named in the decoded claims.
    #[must_use]
    pub fn token(username: impl Into<String>) -> Self {
        Self::Token(TokenCredential {
            username: username.into(),
            secret: None,
        })
    }

    /// Build an unrecognized presentation from the raw scheme text.
    ///
    /// The scheme ends up in error messages and logs, so anything that is not
    /// a short run of ASCII letters (or `-`) is replaced by [`UNKNOWN_SCHEME`].
    #[must_use]
    pub fn unrecognized(raw_scheme: &str) -> Self {
        Self::Unrecognized {
            scheme: scheme_label(raw_scheme),
        }
    }

    /// Short label of the credential kind, safe to log.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Basic(_) => "basic",
            Self::Token(_) => "token",
            Self::PreAuthenticated(_) => "pre_authenticated",
            Self::Unrecognized { .. } => "unrecognized",
        }
    }
}

/// Sanitized form of a presented scheme name.
#[must_use]
pub fn scheme_label(raw_scheme: &str) -> String {
    let looks_like_scheme = !raw_scheme.is_empty()
        && raw_scheme.len() <= MAX_SCHEME_LEN
        && raw_scheme
            .bytes()
            .all(|b| b.is_ascii_alphabetic() || b == b'-');
    if looks_like_scheme {
        raw_scheme.to_owned()
    } else {
        UNKNOWN_SCHEME.to_owned()
    }
}

/// Username/password presentation.
#[derive(Debug, Clone)]
pub struct BasicCredential {
    pub username: String,
    pub secret: SecretString,
}

/// Decoded token presentation.
///
/// `username` is the subject claim. `secret` carries the raw token when the
/// decoder keeps it; the resolver does not verify it.
#[derive(Debug, Clone)]
pub struct TokenCredential {
    pub username: String,
    pub secret: Option<SecretString>,
}
