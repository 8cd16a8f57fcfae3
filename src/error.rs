// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, result};

use thiserror::Error;

pub type Result<T, E = Error> = result::Result<T, E>;

/// Everything that can go wrong before, during, or after a remote call,
/// except for the backend rejecting the call. Rejections are data and come
/// back as [`crate::Response::Failure`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] Config),
    #[error("network failure: {0}")]
    Transport(#[from] Transport),
    #[error("unparseable response: {0}")]
    Payload(#[from] Payload),
}

impl Error {
    pub const fn is_config(&self) -> bool {
        matches!(*self, Self::Config(_))
    }

    pub const fn is_transport(&self) -> bool {
        matches!(*self, Self::Transport(_))
    }

    pub const fn is_payload(&self) -> bool {
        matches!(*self, Self::Payload(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Transport(Transport::Io(value.into())),
            _ => Self::Payload(Payload::Json(value)),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(Transport::Http(value))
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Transport(Transport::Io(value))
    }
}

impl From<url::ParseError> for Error {
    fn from(value: url::ParseError) -> Self {
        Self::Config(Config::InvalidHost(value))
    }
}

/// Preconditions that must hold before any request leaves the process.
#[derive(Error, Debug)]
pub enum Config {
    #[error("host is not set")]
    HostNotSet,
    #[error("token is not set; log in first")]
    TokenNotSet,
    #[error("host is not a valid URL: {0}")]
    InvalidHost(url::ParseError),
    #[error(r#"host "{}" cannot carry a relative path"#, .0.escape_default())]
    HostNotABase(String),
}

#[derive(Error, Debug)]
pub enum Transport {
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
    #[error("IO operation failed: {0}")]
    Io(io::Error),
}

#[derive(Error, Debug)]
pub enum Payload {
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("expected a JSON object, array or null, but got {0}")]
    UnexpectedShape(&'static str),
}
