use super::{
    password::{self, PasswordHash, DEFAULT_COST, MAX_COST, MIN_COST},
    token::{self, SessionClaims, SigningKey},
    Error,
};
use secrecy::SecretString;
use serde::Serialize;
use utoipa::ToSchema;

/// A signed session token together with its absolute expiry.
#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    token: String,
    expires_at: i64,
}

impl SessionToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Unix seconds after which the token is rejected.
    #[must_use]
    pub const fn expires_at(&self) -> i64 {
        self.expires_at
    }
}

/// Password hashing and session tokens over one injected secret.
///
/// Every method is a pure function of its arguments and the secret, so a
/// single instance is shared by all requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Credentials {
    key: SigningKey,
    cost: u32,
}

impl Credentials {
    /// # Errors
    ///
    /// Fails when the secret is empty or too short to key HS256.
    pub fn new(secret: SecretString) -> Result<Self, Error> {
        Ok(Self {
            key: SigningKey::new(secret)?,
            cost: DEFAULT_COST,
        })
    }

    /// Override the bcrypt cost factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] outside `4..=31`.
    pub fn with_cost(mut self, cost: u32) -> Result<Self, Error> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(Error::InvalidInput("bcrypt cost must be between 4 and 31"));
        }
        self.cost = cost;
        Ok(self)
    }

    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// # Errors
    ///
    /// Returns [`Error::Hashing`] if bcrypt fails.
    pub fn hash_password(&self, plaintext: &str) -> Result<PasswordHash, Error> {
        password::hash_password(plaintext, self.cost)
    }

    /// # Errors
    ///
    /// Returns [`Error::MalformedHash`] when the stored hash cannot be parsed.
    pub fn verify_password(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, Error> {
        password::verify_password(plaintext, hash)
    }

    /// Issue a token for `subject` valid for one hour from `now_unix_seconds`.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded.
    pub fn issue_token(&self, subject: &str, now_unix_seconds: i64) -> Result<SessionToken, Error> {
        let claims = SessionClaims::new(subject, now_unix_seconds);
        let token = token::sign_hs256(&self.key, &claims)?;
        Ok(SessionToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSignature`], [`Error::Expired`] or [`Error::MalformedToken`].
    pub fn verify_token(&self, token: &str, now_unix_seconds: i64) -> Result<String, Error> {
        token::verify_hs256(token, &self.key, now_unix_seconds).map(|claims| claims.sub)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000;
    const MINUTE: i64 = 60;

    fn credentials(secret: &str) -> Credentials {
        Credentials::new(SecretString::from(secret.to_string()))
            .unwrap()
            .with_cost(MIN_COST)
            .unwrap()
    }

    fn secret_a() -> Credentials {
        credentials("0123456789abcdef0123456789abcdef-a")
    }

    #[test]
    fn password_round_trip() {
        let creds = secret_a();
        let hash = creds.hash_password("secret123").unwrap();
        assert!(creds.verify_password("secret123", &hash).unwrap());
        assert!(!creds.verify_password("secret1234", &hash).unwrap());
    }

    #[test]
    fn token_valid_within_the_hour() {
        let creds = secret_a();
        let token = creds.issue_token("a@x.com", T0).unwrap();
        assert_eq!(token.expires_at(), T0 + 60 * MINUTE);
        assert_eq!(
            creds.verify_token(token.as_str(), T0 + 30 * MINUTE).unwrap(),
            "a@x.com"
        );
    }

    #[test]
    fn token_expired_after_the_hour() {
        let creds = secret_a();
        let token = creds.issue_token("a@x.com", T0).unwrap();
        assert!(matches!(
            creds.verify_token(token.as_str(), T0 + 61 * MINUTE),
            Err(Error::Expired)
        ));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = secret_a().issue_token("a@x.com", T0).unwrap();
        let creds_b = credentials("0123456789abcdef0123456789abcdef-b");
        assert!(matches!(
            creds_b.verify_token(token.as_str(), T0),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn default_cost() {
        let creds = Credentials::new(SecretString::from("x".repeat(32))).unwrap();
        assert_eq!(creds.cost(), DEFAULT_COST);
    }

    #[test]
    fn cost_out_of_range() {
        let creds = Credentials::new(SecretString::from("x".repeat(32))).unwrap();
        assert!(matches!(creds.clone().with_cost(3), Err(Error::InvalidInput(_))));
        assert!(matches!(creds.with_cost(32), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn missing_secret() {
        assert!(matches!(
            Credentials::new(SecretString::from(String::new())),
            Err(Error::ConfigurationMissing(_))
        ));
    }
}
