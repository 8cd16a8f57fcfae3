// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Normalization of web service responses.
//!
//! The backend has no single envelope. A successful call answers with a
//! record, a list of records or a bare `null`, and a failed call answers
//! with an object carrying some of `exception`, `errorcode` and `message`.
//! Records and errors share the same untyped shape on the wire, so the only
//! success signal is the absence of all three diagnostic fields.
//!
//! The token endpoint is the odd one out: it signals success by the
//! presence of a non-empty `token`, and is handled by [`parse_token`].

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Payload, Result};

/// Diagnostic fields of a rejected call.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ErrorDetail {
    pub exception: Option<String>,
    pub errorcode: Option<String>,
    pub message: Option<String>,
    pub debuginfo: Option<String>,
}

impl ErrorDetail {
    /// Pick the diagnostic fields out of an arbitrary object. Anything that
    /// is not a string counts as absent, so record fields that happen to
    /// share a name cannot break decoding.
    fn from_object(object: &Map<String, Value>) -> Self {
        let field = |name: &str| object.get(name).and_then(Value::as_str).map(str::to_owned);
        Self {
            exception: field("exception"),
            errorcode: field("errorcode"),
            message: field("message"),
            debuginfo: field("debuginfo"),
        }
    }

    fn is_empty(&self) -> bool {
        [&self.errorcode, &self.exception, &self.message]
            .into_iter()
            .all(|f| f.as_deref().map_or(true, str::is_empty))
    }
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = self
            .errorcode
            .as_deref()
            .or(self.exception.as_deref())
            .unwrap_or("unknown");
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => write!(f, "{code}: {message}"),
            _ => write!(f, "{code}"),
        }
    }
}

/// Outcome of a remote call that reached the backend and got a well-formed
/// answer.
#[derive(Clone, Debug, PartialEq)]
pub enum Response<T> {
    Success(T),
    SuccessArray(Vec<T>),
    Failure(ErrorDetail),
}

impl<T> Response<T> {
    pub const fn is_success(&self) -> bool {
        !matches!(*self, Self::Failure(_))
    }

    pub const fn error(&self) -> Option<&ErrorDetail> {
        match *self {
            Self::Failure(ref e) => Some(e),
            Self::Success(_) | Self::SuccessArray(_) => None,
        }
    }

    /// Successful data as a list, however the backend shaped it.
    pub fn into_items(self) -> Result<Vec<T>, ErrorDetail> {
        match self {
            Self::Success(data) => Ok(vec![data]),
            Self::SuccessArray(data) => Ok(data),
            Self::Failure(e) => Err(e),
        }
    }
}

fn shape(value: &Value) -> &'static str {
    match *value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn parse<T>(raw: &str) -> Result<Response<T>>
where
    T: DeserializeOwned + Default,
{
    if raw.trim().eq_ignore_ascii_case("null") {
        return Ok(Response::Success(T::default()));
    }

    match serde_json::from_str::<Value>(raw)? {
        Value::Array(elements) => Ok(Response::SuccessArray(
            elements
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<_, _>>()?,
        )),
        Value::Object(object) => {
            let error = ErrorDetail::from_object(&object);
            if error.is_empty() {
                Ok(Response::Success(serde_json::from_value(Value::Object(
                    object,
                ))?))
            } else {
                Ok(Response::Failure(error))
            }
        }
        other => Err(Payload::UnexpectedShape(shape(&other)).into()),
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct TokenBody {
    token: Option<String>,
    privatetoken: Option<String>,
    error: Option<String>,
    errorcode: Option<String>,
    exception: Option<String>,
    debuginfo: Option<Value>,
}

/// Credentials handed out by the token endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub token: String,
    pub privatetoken: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenResponse {
    Issued(Token),
    Rejected(ErrorDetail),
}

/// Outcome of a login attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthResult {
    pub succeeded: bool,
    pub error: Option<ErrorDetail>,
}

impl AuthResult {
    pub(crate) const fn success() -> Self {
        Self {
            succeeded: true,
            error: None,
        }
    }

    pub(crate) const fn failure(error: ErrorDetail) -> Self {
        Self {
            succeeded: false,
            error: Some(error),
        }
    }
}

/// Decode an answer of the token endpoint.
pub fn parse_token(raw: &str) -> Result<TokenResponse> {
    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(Payload::UnexpectedShape(shape(&value)).into());
    }

    let body: TokenBody = serde_json::from_value(value)?;
    match body.token {
        Some(token) if !token.is_empty() => Ok(TokenResponse::Issued(Token {
            token,
            privatetoken: body.privatetoken,
        })),
        _ => Ok(TokenResponse::Rejected(ErrorDetail {
            exception: body.exception,
            errorcode: body.errorcode,
            message: body.error,
            debuginfo: body.debuginfo.and_then(|d| match d {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            }),
        })),
    }
}
