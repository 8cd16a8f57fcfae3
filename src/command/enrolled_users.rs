// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use moodle_client::{model::EnrolledUser, Moodle};
use tabled::{settings::Style, Table, Tabled};

use crate::Result;

/// List the participants of a course.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The ID of the course.
    #[clap()]
    course_id: i64,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    fullname: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Roles")]
    roles: String,
}

impl From<EnrolledUser> for Row {
    fn from(value: EnrolledUser) -> Self {
        Self {
            id: value.id,
            username: value.username,
            fullname: value.fullname,
            email: value.email,
            roles: value
                .roles
                .into_iter()
                .map(|r| r.shortname)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, client: &Moodle) -> Result<()> {
        let users = super::records(client.get_enrolled_users(self.course_id).await?)?;
        if !users.is_empty() {
            println!(
                "{}",
                Table::new(users.into_iter().map(Row::from)).with(Style::rounded())
            );
        }
        Ok(())
    }
}
