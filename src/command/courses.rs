// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use moodle_client::{model::UserCourse, Moodle};
use tabled::{settings::Style, Table, Tabled};

use crate::Result;

/// List the courses a user is enrolled in.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The ID of the user.
    #[clap()]
    user_id: i64,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Short Name")]
    shortname: String,
    #[tabled(rename = "Full Name")]
    fullname: String,
    #[tabled(rename = "Participants")]
    participants: i64,
    #[tabled(rename = "Visible")]
    visible: bool,
}

impl From<UserCourse> for Row {
    fn from(value: UserCourse) -> Self {
        Self {
            id: value.id,
            shortname: value.shortname,
            fullname: value.fullname,
            participants: value.enrolledusercount,
            visible: value.visible != 0,
        }
    }
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, client: &Moodle) -> Result<()> {
        let courses = super::records(client.get_user_courses(self.user_id).await?)?;
        if !courses.is_empty() {
            println!(
                "{}",
                Table::new(courses.into_iter().map(Row::from)).with(Style::rounded())
            );
        }
        Ok(())
    }
}
