//! Classification of transport-level `Authorization` values into credentials.
//!
//! The resolver itself never parses tokens. This module is the upstream
//! step that turns a raw header into a [`Credential`], verifying bearer
//! tokens on the way so that the token strategy can trust the subject.

use std::sync::Arc;

use authn_resolver_sdk::{Credential, TokenCredential};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::DomainError;
use crate::config::JwtConfig;

/// Claims the resolver needs from a verified token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Username of the subject.
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: u64,
}

/// Verifies a raw token and returns its claims.
pub trait TokenClaimsDecoder: Send + Sync {
    /// # Errors
    ///
    /// `InvalidCredentials` when the signature, expiry or shape is wrong.
    fn decode(&self, token: &str) -> Result<TokenClaims, DomainError>;
}

/// HS256 JWT decoder.
pub struct JwtClaimsDecoder {
    key: DecodingKey,
    validation: Validation,
}

impl JwtClaimsDecoder {
    #[must_use]
    pub fn from_config(cfg: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = cfg.leeway_secs;
        Self {
            key: DecodingKey::from_secret(cfg.hs256_secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

impl TokenClaimsDecoder for JwtClaimsDecoder {
    fn decode(&self, token: &str) -> Result<TokenClaims, DomainError> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "bearer token rejected");
                DomainError::InvalidCredentials
            })
    }
}

/// Turns `Authorization` header values into [`Credential`]s.
///
/// - `Basic <base64(username:password)>` becomes [`Credential::Basic`]
/// - `Bearer <token>` is verified by the configured decoder and becomes
///   [`Credential::Token`]
/// - anything else becomes [`Credential::Unrecognized`]
#[derive(Clone, Default)]
pub struct CredentialExtractor {
    decoder: Option<Arc<dyn TokenClaimsDecoder>>,
}

impl CredentialExtractor {
    /// Extractor that accepts `Basic` only; bearer tokens come out unrecognized.
    #[must_use]
    pub fn basic_only() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_decoder(decoder: Arc<dyn TokenClaimsDecoder>) -> Self {
        Self {
            decoder: Some(decoder),
        }
    }

    #[must_use]
    pub fn accepts_tokens(&self) -> bool {
        self.decoder.is_some()
    }

    /// Classify a raw `Authorization` header value.
    ///
    /// # Errors
    ///
    /// - `MalformedCredential` for an undecodable `Basic` payload
    /// - `InvalidCredentials` for a bearer token that fails verification
    pub fn from_authorization_header(&self, value: &str) -> Result<Credential, DomainError> {
        let value = value.trim();
        let (scheme, payload) = match value.split_once(' ') {
            Some(parts) => parts,
            None if is_known_scheme(value) => (value, ""),
            // A bare value (raw API key, token without scheme) names no scheme.
            None => return Ok(Credential::unrecognized("")),
        };
        let payload = payload.trim();

        if scheme.eq_ignore_ascii_case("basic") {
            return decode_basic(payload);
        }
        if scheme.eq_ignore_ascii_case("bearer") {
            if let Some(decoder) = &self.decoder {
                let claims = decoder.decode(payload)?;
                return Ok(Credential::Token(TokenCredential {
                    username: claims.sub,
                    secret: Some(SecretString::from(payload.to_owned())),
                }));
            }
        }

        Ok(Credential::unrecognized(scheme))
    }
}

fn is_known_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("basic") || scheme.eq_ignore_ascii_case("bearer")
}

fn decode_basic(payload: &str) -> Result<Credential, DomainError> {
    let raw = STANDARD
        .decode(payload)
        .map_err(|e| DomainError::MalformedCredential(format!("basic payload: {e}")))?;
    let decoded = String::from_utf8(raw)
        .map_err(|_| DomainError::MalformedCredential("basic payload is not UTF-8".to_owned()))?;
    let (username, password) = decoded.split_once(':').ok_or_else(|| {
        DomainError::MalformedCredential("basic payload has no ':' separator".to_owned())
    })?;
    if username.is_empty() {
        return Err(DomainError::MalformedCredential(
            "basic payload has an empty username".to_owned(),
        ));
    }
    Ok(Credential::basic(username, password))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use jsonwebtoken::{EncodingKey, Header};
    use serde::Serialize;

    use super::*;

    const SECRET: &str = "unit-test-signing-key";

    #[derive(Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        exp: u64,
    }

    fn sign(sub: &str, exp: u64, key: &str) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &Claims { sub, exp },
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> u64 {
        u64::try_from(chrono::Utc::now().timestamp()).unwrap() + 3_600
    }

    fn extractor() -> CredentialExtractor {
        CredentialExtractor::with_decoder(Arc::new(JwtClaimsDecoder::from_config(&JwtConfig {
            hs256_secret: SecretString::from(SECRET.to_owned()),
            leeway_secs: 0,
        })))
    }

    #[test]
    fn basic_header_is_decoded() {
        let header = format!("Basic {}", STANDARD.encode("alice:correct-pw"));

        let credential = extractor().from_authorization_header(&header).unwrap();
        let Credential::Basic(basic) = credential else {
            panic!("expected basic credential");
        };
        assert_eq!(basic.username, "alice");
        assert_eq!(basic.secret.expose_secret(), "correct-pw");
    }

    #[test]
    fn basic_password_may_contain_colons() {
        let header = format!("basic {}", STANDARD.encode("bob:a:b:c"));

        let Credential::Basic(basic) = extractor().from_authorization_header(&header).unwrap()
        else {
            panic!("expected basic credential");
        };
        assert_eq!(basic.secret.expose_secret(), "a:b:c");
    }

    #[test]
    fn malformed_basic_payload_is_rejected() {
        let no_separator = format!("Basic {}", STANDARD.encode("alice"));
        assert!(matches!(
            extractor().from_authorization_header(&no_separator),
            Err(DomainError::MalformedCredential(_))
        ));
        assert!(matches!(
            extractor().from_authorization_header("Basic !!!not-base64"),
            Err(DomainError::MalformedCredential(_))
        ));
    }

    #[test]
    fn valid_bearer_token_becomes_token_credential() {
        let token = sign("alice", in_one_hour(), SECRET);

        let credential = extractor()
            .from_authorization_header(&format!("Bearer {token}"))
            .unwrap();
        let Credential::Token(claims) = credential else {
            panic!("expected token credential");
        };
        assert_eq!(claims.username, "alice");
        assert_eq!(
            claims.secret.as_ref().map(ExposeSecret::expose_secret),
            Some(token.as_str())
        );
    }

    #[test]
    fn bearer_token_with_wrong_signature_is_invalid() {
        let token = sign("alice", in_one_hour(), "some-other-key");

        assert_eq!(
            extractor()
                .from_authorization_header(&format!("Bearer {token}"))
                .unwrap_err(),
            DomainError::InvalidCredentials
        );
    }

    #[test]
    fn expired_bearer_token_is_invalid() {
        let token = sign("alice", 1_000, SECRET);

        assert_eq!(
            extractor()
                .from_authorization_header(&format!("Bearer {token}"))
                .unwrap_err(),
            DomainError::InvalidCredentials
        );
    }

    #[test]
    fn bearer_without_decoder_is_unrecognized() {
        let credential = CredentialExtractor::basic_only()
            .from_authorization_header("Bearer abc.def.ghi")
            .unwrap();
        assert!(matches!(
            credential,
            Credential::Unrecognized { ref scheme } if scheme == "Bearer"
        ));
    }

    #[test]
    fn bare_header_value_is_not_echoed_as_scheme() {
        let credential = extractor()
            .from_authorization_header("sk_live_TOPSECRETAPIKEY")
            .unwrap();
        assert!(matches!(
            credential,
            Credential::Unrecognized { ref scheme } if scheme == "unknown"
        ));

        assert!(matches!(
            extractor().from_authorization_header("Basic"),
            Err(DomainError::MalformedCredential(_))
        ));
    }

    #[test]
    fn secret_looking_scheme_is_not_echoed() {
        let credential = extractor()
            .from_authorization_header("sk_live_TOPSECRETAPIKEY trailing")
            .unwrap();
        assert!(matches!(
            credential,
            Credential::Unrecognized { ref scheme } if scheme == "unknown"
        ));
    }

    #[test]
    fn unknown_scheme_is_unrecognized() {
        let credential = extractor()
            .from_authorization_header("Digest username=\"alice\"")
            .unwrap();
        assert!(matches!(
            credential,
            Credential::Unrecognized { ref scheme } if scheme == "Digest"
        ));
    }
}
