//! HS256 session tokens.
//!
//! Wire format: `base64url(header).base64url(claims).base64url(hmac)`, all
//! unpadded. The MAC covers the first two segments exactly as received.

use super::Error;
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of a session token.
pub const SESSION_TTL_SECONDS: i64 = 60 * 60;

/// HS256 keys shorter than the digest are rejected.
pub const MIN_SECRET_BYTES: usize = 32;

const ALG: &str = "HS256";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTokenHeader {
    pub alg: String,
    pub typ: String,
}

impl SessionTokenHeader {
    fn hs256() -> Self {
        Self {
            alg: ALG.to_string(),
            typ: "JWT".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String,
    /// Issued-at; tokens carrying only `sub` and `exp` are accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    pub exp: i64,
}

impl SessionClaims {
    #[must_use]
    pub fn new(subject: impl Into<String>, now_unix_seconds: i64) -> Self {
        Self {
            sub: subject.into(),
            iat: Some(now_unix_seconds),
            exp: now_unix_seconds.saturating_add(SESSION_TTL_SECONDS),
        }
    }
}

/// Process-wide HMAC secret, keyed once at startup.
#[derive(Clone)]
pub struct SigningKey {
    mac: HmacSha256,
}

impl SigningKey {
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationMissing`] for an empty secret and
    /// [`Error::InsecureSecret`] for one shorter than [`MIN_SECRET_BYTES`].
    pub fn new(secret: SecretString) -> Result<Self, Error> {
        let bytes = secret.expose_secret().as_bytes();
        if bytes.is_empty() {
            return Err(Error::ConfigurationMissing("signing secret"));
        }
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(Error::InsecureSecret {
                min_len: MIN_SECRET_BYTES,
            });
        }
        let mac = HmacSha256::new_from_slice(bytes)
            .map_err(|_| Error::ConfigurationMissing("signing secret"))?;
        Ok(Self { mac })
    }

    fn mac(&self) -> HmacSha256 {
        self.mac.clone()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(***)")
    }
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Error> {
    let bytes =
        Base64UrlUnpadded::decode_vec(s).map_err(|_| Error::MalformedToken("invalid base64url"))?;
    serde_json::from_slice(&bytes).map_err(|_| Error::MalformedToken("invalid json"))
}

/// Sign claims into a compact token.
///
/// # Errors
///
/// Returns an error if the header or claims cannot be encoded.
pub fn sign_hs256(key: &SigningKey, claims: &SessionClaims) -> Result<String, Error> {
    let header_b64 = b64e_json(&SessionTokenHeader::hs256())?;
    let claims_b64 = b64e_json(claims)?;
    let signing_input = format!("{header_b64}.{claims_b64}");

    let mut mac = key.mac();
    mac.update(signing_input.as_bytes());
    let signature_b64 = Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature_b64}"))
}

/// Verify a compact token and return its claims.
///
/// The signature is checked before anything in the claims is trusted, and the
/// expiry after that.
///
/// # Errors
///
/// - [`Error::MalformedToken`] if the token is not three well formed segments
///   or names an algorithm other than HS256,
/// - [`Error::InvalidSignature`] if the MAC does not match,
/// - [`Error::Expired`] if `exp <= now_unix_seconds`.
pub fn verify_hs256(
    token: &str,
    key: &SigningKey,
    now_unix_seconds: i64,
) -> Result<SessionClaims, Error> {
    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(Error::MalformedToken("missing header"))?;
    let claims_b64 = parts.next().ok_or(Error::MalformedToken("missing claims"))?;
    let sig_b64 = parts
        .next()
        .ok_or(Error::MalformedToken("missing signature"))?;
    if parts.next().is_some() {
        return Err(Error::MalformedToken("too many segments"));
    }

    let header: SessionTokenHeader = b64d_json(header_b64)?;
    if header.alg != ALG {
        return Err(Error::MalformedToken("unsupported algorithm"));
    }

    let signature = Base64UrlUnpadded::decode_vec(sig_b64)
        .map_err(|_| Error::MalformedToken("invalid base64url"))?;
    let mut mac = key.mac();
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(claims_b64.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| Error::InvalidSignature)?;

    let claims: SessionClaims = b64d_json(claims_b64)?;
    if claims.exp <= now_unix_seconds {
        return Err(Error::Expired);
    }

    Ok(claims)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn key(secret: &str) -> SigningKey {
        SigningKey::new(SecretString::from(secret.to_string())).unwrap()
    }

    fn key_a() -> SigningKey {
        key("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
    }

    #[test]
    fn sign_and_verify() -> Result<(), Error> {
        let claims = SessionClaims::new("a@x.com", NOW);
        let token = sign_hs256(&key_a(), &claims)?;
        assert_eq!(token.split('.').count(), 3);

        let verified = verify_hs256(&token, &key_a(), NOW + 30 * 60)?;
        assert_eq!(verified, claims);
        assert_eq!(verified.exp, NOW + SESSION_TTL_SECONDS);
        Ok(())
    }

    #[test]
    fn header_is_standard_hs256() -> Result<(), Error> {
        let token = sign_hs256(&key_a(), &SessionClaims::new("a@x.com", NOW))?;
        let header_b64 = token.split('.').next().unwrap();
        let header: SessionTokenHeader = b64d_json(header_b64)?;
        assert_eq!(header, SessionTokenHeader::hs256());
        Ok(())
    }

    #[test]
    fn signing_is_deterministic() -> Result<(), Error> {
        let claims = SessionClaims::new("a@x.com", NOW);
        assert_eq!(
            sign_hs256(&key_a(), &claims)?,
            sign_hs256(&key_a(), &claims)?
        );
        Ok(())
    }

    #[test]
    fn expiry_is_exclusive() -> Result<(), Error> {
        let token = sign_hs256(&key_a(), &SessionClaims::new("a@x.com", NOW))?;
        assert!(verify_hs256(&token, &key_a(), NOW + SESSION_TTL_SECONDS - 1).is_ok());
        assert!(matches!(
            verify_hs256(&token, &key_a(), NOW + SESSION_TTL_SECONDS),
            Err(Error::Expired)
        ));
        assert!(matches!(
            verify_hs256(&token, &key_a(), NOW + 61 * 60),
            Err(Error::Expired)
        ));
        Ok(())
    }

    #[test]
    fn wrong_key_is_invalid_signature() -> Result<(), Error> {
        let token = sign_hs256(&key_a(), &SessionClaims::new("a@x.com", NOW))?;
        let other = key("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
        assert!(matches!(
            verify_hs256(&token, &other, NOW),
            Err(Error::InvalidSignature)
        ));
        Ok(())
    }

    #[test]
    fn signature_is_checked_before_expiry() -> Result<(), Error> {
        let token = sign_hs256(&key_a(), &SessionClaims::new("a@x.com", NOW))?;
        let other = key("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
        assert!(matches!(
            verify_hs256(&token, &other, NOW + 2 * SESSION_TTL_SECONDS),
            Err(Error::InvalidSignature)
        ));
        Ok(())
    }

    #[test]
    fn tampered_claims_are_rejected() -> Result<(), Error> {
        let token = sign_hs256(&key_a(), &SessionClaims::new("a@x.com", NOW))?;
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = b64e_json(&SessionClaims::new("admin@x.com", NOW))?;
        parts[1] = &forged;
        let forged_token = parts.join(".");
        assert!(matches!(
            verify_hs256(&forged_token, &key_a(), NOW),
            Err(Error::InvalidSignature)
        ));
        Ok(())
    }

    #[test]
    fn accepts_sub_and_exp_only() -> Result<(), Error> {
        let header = b64e_json(&SessionTokenHeader::hs256())?;
        let claims = Base64UrlUnpadded::encode_string(br#"{"sub":"a@x.com","exp":1700003600}"#);
        let mut mac = key_a().mac();
        mac.update(format!("{header}.{claims}").as_bytes());
        let signature = Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes());
        let token = format!("{header}.{claims}.{signature}");

        let verified = verify_hs256(&token, &key_a(), NOW)?;
        assert_eq!(verified.sub, "a@x.com");
        assert_eq!(verified.iat, None);
        assert_eq!(verified.exp, NOW + SESSION_TTL_SECONDS);
        Ok(())
    }

    #[test]
    fn malformed_tokens() {
        for token in ["", "abc", "a.b", "a.b.c.d", "!!.??.**"] {
            assert!(
                matches!(
                    verify_hs256(token, &key_a(), NOW),
                    Err(Error::MalformedToken(_))
                ),
                "token {token:?} should be malformed"
            );
        }
    }

    #[test]
    fn other_algorithms_are_rejected() -> Result<(), Error> {
        let header = b64e_json(&SessionTokenHeader {
            alg: "none".to_string(),
            typ: "JWT".to_string(),
        })?;
        let claims = b64e_json(&SessionClaims::new("a@x.com", NOW))?;
        let token = format!("{header}.{claims}.");
        assert!(matches!(
            verify_hs256(&token, &key_a(), NOW),
            Err(Error::MalformedToken("unsupported algorithm"))
        ));
        Ok(())
    }

    #[test]
    fn empty_secret_is_missing_configuration() {
        assert!(matches!(
            SigningKey::new(SecretString::from(String::new())),
            Err(Error::ConfigurationMissing(_))
        ));
    }

    #[test]
    fn short_secret_is_insecure() {
        assert!(matches!(
            SigningKey::new(SecretString::from("short".to_string())),
            Err(Error::InsecureSecret { min_len: 32 })
        ));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        assert_eq!(format!("{:?}", key_a()), "SigningKey(***)");
    }
}
