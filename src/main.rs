// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod command;

use std::{env, io, process, result};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use log::error;
use moodle_client::{Credentials, Moodle, DEFAULT_SERVICE};
use secrecy::SecretString;
use thiserror::Error;
use tokio::task;
use url::Url;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error(transparent)]
    Client(#[from] moodle_client::Error),
    #[error("could not read the password: {0}")]
    Password(#[from] io::Error),
    /// The cause has already been logged.
    #[error("command failed")]
    Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    SiteInfo(command::site_info::Command),
    Courses(command::courses::Command),
    EnrolledUsers(command::enrolled_users::Command),
    Contents(command::contents::Command),
}

#[async_trait]
impl command::Command for Command {
    async fn execute(self, client: &Moodle) -> Result<()> {
        match self {
            Self::SiteInfo(cmd) => cmd.execute(client).await,
            Self::Courses(cmd) => cmd.execute(client).await,
            Self::EnrolledUsers(cmd) => cmd.execute(client).await,
            Self::Contents(cmd) => cmd.execute(client).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The base URL of the Moodle site, e.g. https://lms.example.edu/.
    #[arg(long, env = "MOODLE_URL", value_parser = Url::parse)]
    url: Url,

    /// The user to log in as. The password is taken from MOODLE_PASSWORD,
    /// or prompted for if that is not set.
    #[arg(long, short, env = "MOODLE_USERNAME")]
    username: String,

    /// The web service to request a token for.
    #[arg(long, env = "MOODLE_SERVICE", default_value = DEFAULT_SERVICE)]
    service: String,

    #[clap(subcommand)]
    command: Command,
}

async fn password() -> Result<SecretString> {
    if let Ok(password) = env::var("MOODLE_PASSWORD") {
        return Ok(SecretString::new(password));
    }

    Ok(task::spawn_blocking(|| {
        rpassword::prompt_password("Password: ").map(SecretString::new)
    })
    .await
    .map_err(io::Error::from)??)
}

async fn run(args: Args) -> Result<()> {
    let client = Moodle::connect(args.url.as_str())?;

    let credentials = Credentials::new(args.username, password().await?).with_service(args.service);
    let auth = client.login(&credentials).await?;
    if !auth.succeeded {
        match auth.error {
            Some(e) => error!("The site refused to log us in: {}", e),
            None => error!("The site refused to log us in"),
        }
        return Err(Error::Command);
    }

    command::Command::execute(args.command, &client).await
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("MOODLE_LOG", "warn")
        .write_style("MOODLE_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let inner = moodle_client::Error::from(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        let message = inner.to_string();

        let err = Error::from(inner);
        assert!(matches!(err, Error::Client(ref e) if e.is_transport()));
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn password_read_failures_are_not_client_errors() {
        let err = Error::from(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, Error::Password(_)));
        assert_eq!(Error::Command.to_string(), "command failed");
    }
}
