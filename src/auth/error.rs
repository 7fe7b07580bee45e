use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("user already exists")]
    DuplicateUser,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("stored password hash is malformed")]
    MalformedHash,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token: {0}")]
    MalformedToken(&'static str),
    #[error("missing configuration: {0}")]
    ConfigurationMissing(&'static str),
    #[error("signing secret must be at least {min_len} bytes")]
    InsecureSecret { min_len: usize },
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("password hashing failed")]
    Hashing(#[source] bcrypt::BcryptError),
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
    #[error("store error")]
    Store(#[from] StoreError),
    #[error("blocking task failed")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Whether the error came from the caller's input rather than the service.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUser
                | Self::InvalidCredentials
                | Self::InvalidSignature
                | Self::Expired
                | Self::MalformedToken(_)
                | Self::InvalidInput(_)
        )
    }
}
