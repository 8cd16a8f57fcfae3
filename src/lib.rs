// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! A typed client for the Moodle web service REST protocol.
//!
//! [`Moodle`] logs in against a site's token endpoint and then exposes one
//! async method per supported web service function. Each method sends a
//! single GET request and answers with a [`Response`]: the decoded data on
//! success, or the backend's [`ErrorDetail`] when the call was rejected.
//! Anything that keeps a call from producing such an answer, like a missing
//! token or a broken connection, is an [`Error`].
//!
//! ```no_run
//! # async fn run() -> moodle_client::Result<()> {
//! use moodle_client::{Credentials, Moodle, Response};
//! use secrecy::SecretString;
//!
//! let moodle = Moodle::connect("https://lms.example.edu/")?;
//! let credentials = Credentials::new("alice", SecretString::new("s3cret".to_owned()));
//! if moodle.login(&credentials).await?.succeeded {
//!     if let Response::Success(info) = moodle.get_site_info(None).await? {
//!         println!("{}", info.sitename);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

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

pub mod client;
pub mod error;
pub mod model;
pub mod procedure;
pub mod query;
pub mod response;
pub mod session;
pub mod transport;

pub use client::Moodle;
pub use error::{Error, Result};
pub use procedure::Procedure;
pub use query::{Format, Params, UNSET};
pub use response::{AuthResult, ErrorDetail, Response};
pub use session::{Credentials, State, DEFAULT_SERVICE};
pub use transport::{HttpTransport, Transport};
