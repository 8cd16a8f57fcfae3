// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Data shapes exchanged with the web service.
//!
//! Result shapes tolerate missing fields: the backend omits whatever the
//! calling user may not see, and a bare `null` response decodes to the
//! default value of the expected shape.

mod calendar;
mod course;
mod grade;
mod group;
mod site;
mod user;

use serde::Deserialize;
use serde_repr::Deserialize_repr;

pub use calendar::{Event, EventBatch, EventDeletionBatch, Events};
pub use course::{
    Category, Course, CourseFormatOption, CourseOptions, CourseStub, CourseUpdate, CreatedCourse,
    Module, NewCourse, Section, UserCourse,
};
pub use grade::{Grade, GradeItem, GradeOutcome, Grades, GradingArea, GradingDefinition, GradingDefinitions};
pub use group::{Group, GroupBatch};
pub use site::{AdvancedFeature, Function, SiteInfo};
pub use user::{
    CreatedUser, CustomField, EnrolledCourse, EnrolledUser, Enrolment, NewUser, Preference, Role,
    RoleAssignment, User, UserProfile, UserSearch, UserUpdate,
};

/// How a rich-text field is to be interpreted.
#[derive(Copy, Clone, Debug, Default, Deserialize_repr, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TextFormat {
    #[default]
    Moodle = 0,
    Html = 1,
    Plain = 2,
    Wiki = 3,
    Markdown = 4,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Warning {
    pub item: Option<String>,
    pub itemid: Option<i64>,
    pub warningcode: String,
    pub message: String,
}

/// Result of procedures that report nothing but, at most, warnings.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Ack {
    pub warnings: Vec<Warning>,
}
