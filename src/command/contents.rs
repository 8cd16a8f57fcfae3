// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use moodle_client::{model::Section, Moodle};
use tabled::{settings::Style, Table, Tabled};

use crate::Result;

/// Show the sections of a course and what they contain.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The ID of the course.
    #[clap()]
    course_id: i64,

    /// Also list sections hidden from students.
    #[arg(long)]
    hidden: bool,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Section")]
    name: String,
    #[tabled(rename = "Visible")]
    visible: bool,
    #[tabled(rename = "Activities")]
    activities: usize,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, client: &Moodle) -> Result<()> {
        let sections = super::records(client.get_contents(self.course_id).await?)?;
        let rows: Vec<_> = sections
            .into_iter()
            .filter(|section: &Section| self.hidden || section.visible != 0)
            .map(|section| Row {
                visible: section.visible != 0,
                activities: section.modules.len(),
                name: section.name,
            })
            .collect();

        if !rows.is_empty() {
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
        Ok(())
    }
}
