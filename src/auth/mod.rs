//! Credential and session handling.
//!
//! [`Credentials`] owns the four pure operations (hash, verify, issue, verify
//! token) over a secret injected at construction. [`Accounts`] combines them
//! with a [`UserStore`](crate::store::UserStore) into the register, login and
//! bearer flows used by the HTTP layer.

pub mod accounts;
pub mod credentials;
pub mod error;
pub mod password;
pub mod token;

pub use self::accounts::{Accounts, AuthSession, Registration};
pub use self::credentials::{Credentials, SessionToken};
pub use self::error::Error;
pub use self::password::PasswordHash;
pub use self::token::SESSION_TTL_SECONDS;
