// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use serde::Deserialize;

use crate::query::Params;

use super::{TextFormat, Warning};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub format: TextFormat,
    pub courseid: i64,
    pub groupid: i64,
    pub userid: i64,
    pub repeatid: i64,
    pub modulename: String,
    pub instance: i64,
    pub eventtype: String,
    pub timestart: i64,
    pub timeduration: i64,
    pub visible: i64,
    pub uuid: String,
    pub sequence: i64,
    pub timemodified: i64,
    pub subscriptionid: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Events {
    pub events: Vec<Event>,
    pub warnings: Vec<Warning>,
}

/// Calendar events to create in one call, given column by column. See
/// [`super::GroupBatch`] for how uneven columns are treated.
#[derive(Clone, Debug, Default)]
pub struct EventBatch {
    pub names: Vec<String>,
    pub descriptions: Vec<String>,
    pub formats: Vec<TextFormat>,
    pub groupids: Vec<i64>,
    pub courseids: Vec<i64>,
    pub repeats: Vec<i64>,
    pub eventtypes: Vec<String>,
    /// Unix timestamps.
    pub timestarts: Vec<i64>,
    pub timedurations: Vec<Duration>,
    pub visible: Vec<bool>,
    pub sequences: Vec<i64>,
}

impl From<&EventBatch> for Params {
    fn from(value: &EventBatch) -> Self {
        Self::new()
            .with_column("events", "name", &value.names)
            .with_column("events", "groupid", &value.groupids)
            .with_column("events", "courseid", &value.courseids)
            .with_column("events", "description", &value.descriptions)
            .with_column("events", "format", value.formats.iter().copied())
            .with_column("events", "repeats", &value.repeats)
            .with_column("events", "eventtype", &value.eventtypes)
            .with_column("events", "timestart", &value.timestarts)
            .with_column(
                "events",
                "timeduration",
                value.timedurations.iter().map(Duration::as_secs),
            )
            .with_column("events", "visible", value.visible.iter().copied())
            .with_column("events", "sequence", &value.sequences)
    }
}

/// Calendar events to delete in one call, given column by column.
#[derive(Clone, Debug, Default)]
pub struct EventDeletionBatch {
    pub eventids: Vec<i64>,
    /// Whether to delete the whole series the event belongs to.
    pub repeats: Vec<bool>,
    pub descriptions: Vec<String>,
}

impl From<&EventDeletionBatch> for Params {
    fn from(value: &EventDeletionBatch) -> Self {
        Self::new()
            .with_column("events", "repeat", value.repeats.iter().copied())
            .with_column("events", "eventid", &value.eventids)
            .with_column("events", "description", &value.descriptions)
    }
}
