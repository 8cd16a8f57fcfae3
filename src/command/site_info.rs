// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use moodle_client::{Moodle};
use tabled::{settings::Style, Table, Tabled};

use crate::Result;

/// Show the site and the user we are logged in as.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Only count the functions of this web service.
    #[arg(long)]
    service: Option<String>,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, client: &Moodle) -> Result<()> {
        let response = client.get_site_info(self.service.as_deref()).await?;
        for info in super::records(response)? {
            let rows = [
                ("Site", info.sitename),
                ("URL", info.siteurl),
                ("User", format!("{} ({})", info.fullname, info.username)),
                ("Release", info.release),
                ("Version", info.version),
                ("Functions", info.functions.len().to_string()),
            ]
            .map(|(field, value)| Row { field, value });

            println!("{}", Table::new(rows).with(Style::rounded()));
        }
        Ok(())
    }
}
