// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Rendering of remote procedure calls into query strings.
//!
//! The backend takes every argument as a flat query parameter. Lists are
//! spelled with zero-based indices, either `name[N]` for a plain list or
//! `record[N][field]` for a list of records. [`build`] renders a call as
//! written, which is what shows up in logs and tests. The URLs that go on
//! the wire come from [`call_url`] and [`login_url`], which percent-encode
//! every value once and leave the bracketed keys readable.

use std::fmt;

use secrecy::ExposeSecret as _;
use url::{form_urlencoded, Url};

use crate::{
    error::{Config, Result},
    model::TextFormat,
    procedure::Procedure,
    session::Credentials,
};

pub const SERVER_PATH: &str = "webservice/rest/server.php";
pub const TOKEN_PATH: &str = "login/token.php";

/// Integer marker for "not supplied" on parameters whose callers cannot
/// express absence any other way. Dropped exactly like a missing value.
pub const UNSET: i64 = 2_147_483_647;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Int(i64),
}

impl Value {
    fn has_value(&self) -> bool {
        match *self {
            Self::Text(ref s) => !s.is_empty(),
            Self::Int(n) => n != UNSET,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Text(ref s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&i64> for Value {
    fn from(value: &i64) -> Self {
        Self::Int(*value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Text(value.to_string()), Self::Int)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Int(value.into())
    }
}

impl From<TextFormat> for Value {
    fn from(value: TextFormat) -> Self {
        Self::Int((value as u8).into())
    }
}

/// Ordered wire-level arguments of a single call.
///
/// Absent entries are kept in place while the bag is built and skipped when
/// it is rendered, so the relative order of everything else never changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Option<Value>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// A required argument. Sent even when empty.
    #[must_use]
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.entries.push((key.into(), Some(value.into())));
        self
    }

    /// An optional argument. Sent only if present, non-empty and not
    /// [`UNSET`].
    #[must_use]
    pub fn with_opt<K: Into<String>, V: Into<Value>>(mut self, key: K, value: Option<V>) -> Self {
        self.entries
            .push((key.into(), value.map(Into::into).filter(Value::has_value)));
        self
    }

    /// An integer argument that is left out when it equals `unset`.
    #[must_use]
    pub fn with_unless<K: Into<String>>(self, key: K, value: i64, unset: i64) -> Self {
        self.with_opt(key, (value != unset).then_some(value))
    }

    /// A plain list, rendered as `name[0]`, `name[1]`, ...
    #[must_use]
    pub fn with_list<I>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.entries.extend(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (format!("{name}[{i}]"), Some(v.into()))),
        );
        self
    }

    /// One field across a list of records, rendered as `record[0][field]`,
    /// `record[1][field]`, ... Each column is independent: a column shorter
    /// than its siblings stops contributing after its last element.
    #[must_use]
    pub fn with_column<I>(mut self, record: &str, field: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.entries.extend(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (format!("{record}[{i}][{field}]"), Some(v.into()))),
        );
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Encoding {
    Verbatim,
    Percent,
}

fn render<'a, I>(path: &str, pairs: I, encoding: Encoding) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    pairs
        .into_iter()
        .enumerate()
        .fold(path.to_owned(), |mut query, (i, (key, value))| {
            query.push(if i == 0 { '?' } else { '&' });
            query.push_str(key);
            query.push('=');
            match encoding {
                Encoding::Verbatim => query.push_str(&value),
                Encoding::Percent => {
                    query.extend(form_urlencoded::byte_serialize(value.as_bytes()));
                }
            }
            query
        })
}

fn call_pairs<'a>(
    procedure: Procedure,
    token: &'a str,
    format: Format,
    params: &'a Params,
) -> Result<Vec<(&'a str, String)>> {
    if token.is_empty() {
        return Err(Config::TokenNotSet.into());
    }

    Ok([
        ("wstoken", token.to_owned()),
        ("wsfunction", procedure.wire_name().to_owned()),
        ("moodlewsrestformat", format.as_str().to_owned()),
    ]
    .into_iter()
    .chain(params.iter().map(|(key, value)| (key, value.to_string())))
    .collect())
}

fn login_pairs(credentials: &Credentials) -> [(&str, String); 3] {
    [
        ("username", credentials.username.clone()),
        ("password", credentials.password.expose_secret().clone()),
        ("service", credentials.service.clone()),
    ]
}

/// Render an authenticated call to `procedure` as written, without any
/// encoding.
pub fn build(procedure: Procedure, token: &str, format: Format, params: &Params) -> Result<String> {
    Ok(render(
        SERVER_PATH,
        call_pairs(procedure, token, format, params)?,
        Encoding::Verbatim,
    ))
}

/// The request URL of an authenticated call below `host`. Every value is
/// percent-encoded exactly once; keys are sent as written.
pub fn call_url(
    host: &Url,
    procedure: Procedure,
    token: &str,
    format: Format,
    params: &Params,
) -> Result<Url> {
    let query = render(
        SERVER_PATH,
        call_pairs(procedure, token, format, params)?,
        Encoding::Percent,
    );
    Ok(host.join(&query)?)
}

/// Render the token exchange. This is the only call that needs no token.
pub fn build_login(credentials: &Credentials) -> String {
    render(TOKEN_PATH, login_pairs(credentials), Encoding::Verbatim)
}

/// The request URL of the token exchange below `host`.
pub fn login_url(host: &Url, credentials: &Credentials) -> Result<Url> {
    let query = render(TOKEN_PATH, login_pairs(credentials), Encoding::Percent);
    Ok(host.join(&query)?)
}
