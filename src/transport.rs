// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::tls;
use url::Url;

use crate::error::Result;

/// Fetches a URL and hands back the response body.
///
/// Timeouts, cancellation and connection reuse are entirely up to the
/// implementation. A status outside of 2xx must be reported as an error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: Url) -> Result<String>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn get(&self, url: Url) -> Result<String> {
        (**self).get(url).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, url: Url) -> Result<String> {
        (**self).get(url).await
    }
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// A transport that refuses anything older than TLS 1.2 on `https`
    /// hosts.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .min_tls_version(tls::Version::TLS_1_2)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured client, e.g. one with timeouts or a proxy.
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: Url) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
