// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

use crate::query::Params;

use super::TextFormat;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Group {
    pub id: i64,
    pub courseid: i64,
    pub name: String,
    pub description: String,
    pub descriptionformat: TextFormat,
    pub enrolmentkey: String,
    pub idnumber: String,
}

/// Groups to create in one call, given column by column. Element `i` of
/// every column describes group `i`; a shorter column leaves the remaining
/// groups without that field.
#[derive(Clone, Debug, Default)]
pub struct GroupBatch {
    pub names: Vec<String>,
    pub courseids: Vec<i64>,
    pub descriptions: Vec<String>,
    pub descriptionformats: Vec<TextFormat>,
    pub enrolmentkeys: Vec<String>,
    pub idnumbers: Vec<String>,
}

impl From<&GroupBatch> for Params {
    fn from(value: &GroupBatch) -> Self {
        Self::new()
            .with_column("groups", "name", &value.names)
            .with_column("groups", "courseid", &value.courseids)
            .with_column("groups", "description", &value.descriptions)
            .with_column(
                "groups",
                "descriptionformat",
                value.descriptionformats.iter().copied(),
            )
            .with_column("groups", "enrolmentkey", &value.enrolmentkeys)
            .with_column("groups", "idnumber", &value.idnumbers)
    }
}
