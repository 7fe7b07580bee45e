use crate::cli::{
    actions::{server::Args, Action},
    commands::auth::{ARG_BCRYPT_COST, ARG_SECRET},
};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;
    let secret = matches
        .get_one::<String>(ARG_SECRET)
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --secret")?;
    let bcrypt_cost = matches
        .get_one::<u32>(ARG_BCRYPT_COST)
        .copied()
        .unwrap_or(crate::auth::password::DEFAULT_COST);
    let cors_origins = matches
        .get_many::<String>("cors-origin")
        .map(|origins| origins.cloned().collect())
        .unwrap_or_default();

    Ok(Action::Server(Args {
        port,
        dsn,
        secret,
        bcrypt_cost,
        cors_origins,
    }))
}
