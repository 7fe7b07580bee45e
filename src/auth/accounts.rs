//! Registration, login and bearer authentication on top of [`Credentials`]
//! and a [`UserStore`].

use super::{Credentials, Error, PasswordHash, SessionToken};
use crate::store::{NewUser, StoreError, UserProfile, UserStore};
use chrono::Utc;
use regex::Regex;
use std::{fmt, sync::Arc, time::SystemTime};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Registration input. `Debug` never prints the password.
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"***")
            .finish()
    }
}

/// Token plus the profile it was issued for.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: SessionToken,
    pub user: UserProfile,
}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Trim the address and lowercase its domain; the local part is kept as typed.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Unix seconds for token issuance and expiry checks.
#[must_use]
pub fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

pub struct Accounts {
    store: Arc<dyn UserStore>,
    credentials: Arc<Credentials>,
    // Verified against when the email is unknown so both login failures cost one bcrypt run.
    dummy_hash: PasswordHash,
}

impl fmt::Debug for Accounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accounts")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Accounts {
    /// # Errors
    ///
    /// Returns [`Error::Hashing`] if the placeholder hash cannot be computed.
    pub fn new(store: Arc<dyn UserStore>, credentials: Arc<Credentials>) -> Result<Self, Error> {
        let dummy_hash = credentials.hash_password(&Uuid::new_v4().to_string())?;
        Ok(Self {
            store,
            credentials,
            dummy_hash,
        })
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    #[must_use]
    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    /// Create a user and issue its first session token.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for a bad email or empty password,
    /// [`Error::DuplicateUser`] when the email is taken, or a store/hashing failure.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let email = normalize_email(&registration.email);
        if !valid_email(&email) {
            return Err(Error::InvalidInput("invalid email"));
        }
        if registration.password.is_empty() {
            return Err(Error::InvalidInput("password must not be empty"));
        }

        if self.store.find_user_by_email(&email).await?.is_some() {
            debug!("email already registered");
            return Err(Error::DuplicateUser);
        }

        let password_hash = self.hash_blocking(registration.password).await?;

        let user = NewUser {
            id: Uuid::now_v7(),
            name: registration.name,
            surname: registration.surname,
            email,
            phone: registration.phone,
            password_hash,
            created_at: Utc::now(),
        };
        let profile = user.clone().into_record().profile();

        let id = match self.store.insert_user(user).await {
            Ok(id) => id,
            // Lost a race with a concurrent registration.
            Err(StoreError::Duplicate) => return Err(Error::DuplicateUser),
            Err(e) => return Err(e.into()),
        };

        let token = self
            .credentials
            .issue_token(&profile.email, now_unix_seconds())?;

        info!(user_id = %id, "user registered");

        Ok(AuthSession {
            token,
            user: profile,
        })
    }

    /// Check an email/password pair and issue a session token.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCredentials`] for an unknown email, a wrong password or a
    /// corrupted stored hash; store/hashing failures otherwise.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, Error> {
        let email = normalize_email(email);

        let Some(record) = self.store.find_user_by_email(&email).await? else {
            // Keep the timing of an unknown email close to a wrong password.
            let _ = self
                .verify_blocking(password.to_string(), self.dummy_hash.clone())
                .await;
            debug!("unknown email");
            return Err(Error::InvalidCredentials);
        };

        match self
            .verify_blocking(password.to_string(), record.password_hash.clone())
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                debug!("password mismatch");
                return Err(Error::InvalidCredentials);
            }
            Err(Error::MalformedHash) => {
                error!(user_id = %record.id, "stored password hash is malformed");
                return Err(Error::InvalidCredentials);
            }
            Err(e) => return Err(e),
        }

        let token = self.credentials.issue_token(&email, now_unix_seconds())?;

        info!(user_id = %record.id, "login successful");

        Ok(AuthSession {
            token,
            user: record.profile(),
        })
    }

    /// Resolve a bearer token to the profile of its subject.
    ///
    /// # Errors
    ///
    /// Token errors as returned by [`Credentials::verify_token`];
    /// [`Error::InvalidCredentials`] if the subject no longer exists.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<UserProfile, Error> {
        let subject = self.credentials.verify_token(token, now_unix_seconds())?;

        self.store
            .find_user_by_email(&subject)
            .await?
            .map(|record| record.profile())
            .ok_or(Error::InvalidCredentials)
    }

    async fn hash_blocking(&self, password: String) -> Result<PasswordHash, Error> {
        let credentials = Arc::clone(&self.credentials);
        tokio::task::spawn_blocking(move || credentials.hash_password(&password)).await?
    }

    async fn verify_blocking(&self, password: String, hash: PasswordHash) -> Result<bool, Error> {
        let credentials = Arc::clone(&self.credentials);
        tokio::task::spawn_blocking(move || credentials.verify_password(&password, &hash)).await?
    }
}
