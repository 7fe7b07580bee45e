//! # Sesame
//!
//! `sesame` is a small registration and login service. Users register with an
//! email and password, the password is stored as a bcrypt hash, and both
//! registration and login answer with a signed, stateless session token.
//!
//! ## Credentials
//!
//! Passwords are cut to their first 72 bytes before hashing so that hashes
//! stay compatible with any bcrypt implementation that stored them. Hashes
//! never leave the store adapter except through [`auth::Credentials::verify_password`].
//!
//! ## Sessions
//!
//! Session tokens are compact HS256 tokens (`header.claims.signature`) with a
//! `sub` (the user email) and an absolute `exp` one hour after issuance. There
//! is no server-side session table: a token is valid when its MAC checks out
//! under the configured secret and it has not expired.
//!
//! ## Errors
//!
//! Login failures never reveal whether the email exists: unknown email and
//! wrong password both surface as [`auth::Error::InvalidCredentials`].

pub mod auth;
pub mod cli;
pub mod sesame;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
