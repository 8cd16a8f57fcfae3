// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use secrecy::{ExposeSecret as _, SecretString};
use url::Url;

use crate::error::{Config, Result};

/// Service that mobile and third-party clients authenticate against unless
/// the site administrator set up another one.
pub const DEFAULT_SERVICE: &str = "moodle_mobile_app";

#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    pub service: String,
}

impl Credentials {
    pub fn new<U: Into<String>>(username: U, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
            service: DEFAULT_SERVICE.to_owned(),
        }
    }

    #[must_use]
    pub fn with_service<S: Into<String>>(mut self, service: S) -> Self {
        self.service = service.into();
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Anonymous,
    Authenticated,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Session {
    host: Option<Url>,
    token: Option<SecretString>,
}

impl Session {
    pub(crate) const fn new() -> Self {
        Self {
            host: None,
            token: None,
        }
    }

    pub(crate) fn set_host(&mut self, host: &str) -> Result<()> {
        let mut url = Url::parse(host)?;
        if url.cannot_be_a_base() {
            return Err(Config::HostNotABase(host.to_owned()).into());
        }
        url.set_query(None);
        url.set_fragment(None);
        // Relative joins replace the last path segment unless it is empty.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.host = Some(url);
        Ok(())
    }

    pub(crate) fn host(&self) -> Result<&Url> {
        self.host.as_ref().ok_or_else(|| Config::HostNotSet.into())
    }

    pub(crate) fn token(&self) -> Result<&SecretString> {
        self.token
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty())
            .ok_or_else(|| Config::TokenNotSet.into())
    }

    pub(crate) fn authenticate(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    pub(crate) fn state(&self) -> State {
        if self.token().is_ok() {
            State::Authenticated
        } else {
            State::Anonymous
        }
    }
}
