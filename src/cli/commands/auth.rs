use clap::{Arg, Command};

pub const ARG_SECRET: &str = "secret";
pub const ARG_BCRYPT_COST: &str = "bcrypt-cost";

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SECRET)
                .long("secret")
                .help("HMAC secret used to sign session tokens (at least 32 bytes)")
                .env("SESAME_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_BCRYPT_COST)
                .long("bcrypt-cost")
                .help("bcrypt cost factor for new password hashes")
                .env("SESAME_BCRYPT_COST")
                .default_value("12")
                .value_parser(clap::value_parser!(u32).range(4..=31)),
        )
}
