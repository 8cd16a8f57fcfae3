// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use log::error;
use moodle_client::{Moodle, Response};

use crate::{Error, Result};

pub(crate) mod contents;
pub(crate) mod courses;
pub(crate) mod enrolled_users;
pub(crate) mod site_info;

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, client: &Moodle) -> Result<()>;
}

/// Unwrap the records of a response, logging a rejection.
fn records<T>(response: Response<T>) -> Result<Vec<T>> {
    response.into_items().map_err(|e| {
        error!("The site rejected the request: {}", e);
        Error::Command
    })
}
