// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

use crate::query::Params;

use super::TextFormat;

/// A course as listed for one of its enrolled users.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserCourse {
    pub id: i64,
    pub shortname: String,
    pub fullname: String,
    pub enrolledusercount: i64,
    pub idnumber: String,
    pub visible: i64,
    pub summary: String,
    pub summaryformat: TextFormat,
    pub format: String,
    pub showgrades: bool,
    pub lang: String,
    pub enablecompletion: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Course {
    pub id: i64,
    pub shortname: String,
    pub categoryid: i64,
    pub categorysortorder: i64,
    pub fullname: String,
    pub displayname: String,
    pub idnumber: String,
    pub summary: String,
    pub summaryformat: TextFormat,
    pub format: String,
    pub showgrades: i64,
    pub newsitems: i64,
    pub startdate: i64,
    pub numsections: Option<i64>,
    pub maxbytes: i64,
    pub showreports: i64,
    pub visible: i64,
    pub hiddensections: Option<i64>,
    pub groupmode: i64,
    pub groupmodeforce: i64,
    pub defaultgroupingid: i64,
    pub timecreated: i64,
    pub timemodified: i64,
    pub enablecompletion: i64,
    pub completionnotify: i64,
    pub lang: String,
    pub forcetheme: String,
    pub courseformatoptions: Vec<CourseFormatOption>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CourseFormatOption {
    pub name: String,
    pub value: serde_json::Value,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub idnumber: String,
    pub description: String,
    pub descriptionformat: TextFormat,
    pub parent: i64,
    pub sortorder: i64,
    pub coursecount: i64,
    pub visible: i64,
    pub visibleold: i64,
    pub timemodified: i64,
    pub depth: i64,
    pub path: String,
    pub theme: Option<String>,
}

/// One section of a course and the activities it holds.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Section {
    pub id: i64,
    pub name: String,
    pub visible: i64,
    pub summary: String,
    pub summaryformat: TextFormat,
    pub modules: Vec<Module>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Module {
    pub id: i64,
    pub name: String,
    pub visible: i64,
    pub modicon: String,
    pub modname: String,
    pub modplural: String,
    pub availability: Option<String>,
    pub indent: i64,
    pub url: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CreatedCourse {
    pub id: i64,
    pub shortname: String,
}

/// Optional course settings shared by creation and update. Unset fields
/// keep the site defaults.
#[derive(Clone, Debug, Default)]
pub struct CourseOptions {
    pub idnumber: Option<String>,
    pub summary: Option<String>,
    pub summaryformat: Option<TextFormat>,
    pub format: Option<String>,
    pub showgrades: Option<bool>,
    pub newsitems: Option<i64>,
    /// Unix timestamp.
    pub startdate: Option<i64>,
    pub numsections: Option<i64>,
    pub maxbytes: Option<i64>,
    pub showreports: Option<bool>,
    pub visible: Option<bool>,
    pub hiddensections: Option<i64>,
    pub groupmode: Option<i64>,
    pub groupmodeforce: Option<bool>,
    pub defaultgroupingid: Option<i64>,
    pub enablecompletion: Option<bool>,
    pub completionnotify: Option<bool>,
    pub lang: Option<String>,
    pub forcetheme: Option<String>,
}

impl CourseOptions {
    fn append_to(&self, params: Params) -> Params {
        params
            .with_opt("courses[0][idnumber]", self.idnumber.as_ref())
            .with_opt("courses[0][summary]", self.summary.as_ref())
            .with_opt("courses[0][summaryformat]", self.summaryformat)
            .with_opt("courses[0][format]", self.format.as_ref())
            .with_opt("courses[0][showgrades]", self.showgrades)
            .with_opt("courses[0][startdate]", self.startdate)
            .with_opt("courses[0][newsitems]", self.newsitems)
            .with_opt("courses[0][numsections]", self.numsections)
            .with_opt("courses[0][maxbytes]", self.maxbytes)
            .with_opt("courses[0][showreports]", self.showreports)
            .with_opt("courses[0][visible]", self.visible)
            .with_opt("courses[0][hiddensections]", self.hiddensections)
            .with_opt("courses[0][groupmode]", self.groupmode)
            .with_opt("courses[0][groupmodeforce]", self.groupmodeforce)
            .with_opt("courses[0][defaultgroupingid]", self.defaultgroupingid)
            .with_opt("courses[0][enablecompletion]", self.enablecompletion)
            .with_opt("courses[0][completionnotify]", self.completionnotify)
            .with_opt("courses[0][lang]", self.lang.as_ref())
            .with_opt("courses[0][forcetheme]", self.forcetheme.as_ref())
    }
}

#[derive(Clone, Debug, Default)]
pub struct NewCourse {
    pub fullname: String,
    pub shortname: String,
    pub categoryid: i64,
    pub options: CourseOptions,
}

impl From<&NewCourse> for Params {
    fn from(value: &NewCourse) -> Self {
        value.options.append_to(
            Self::new()
                .with("courses[0][fullname]", &value.fullname)
                .with("courses[0][shortname]", &value.shortname)
                .with("courses[0][categoryid]", value.categoryid),
        )
    }
}

/// The mandatory part of a course, for creating several in one call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CourseStub {
    pub fullname: String,
    pub shortname: String,
    pub categoryid: i64,
}

impl CourseStub {
    pub(crate) fn to_params(courses: &[Self]) -> Params {
        courses
            .iter()
            .enumerate()
            .fold(Params::new(), |params, (i, course)| {
                params
                    .with(format!("courses[{i}][fullname]"), &course.fullname)
                    .with(format!("courses[{i}][shortname]"), &course.shortname)
                    .with(format!("courses[{i}][categoryid]"), course.categoryid)
            })
    }
}

#[derive(Clone, Debug, Default)]
pub struct CourseUpdate {
    pub id: i64,
    pub fullname: Option<String>,
    pub shortname: Option<String>,
    pub categoryid: Option<i64>,
    pub options: CourseOptions,
}

impl From<&CourseUpdate> for Params {
    fn from(value: &CourseUpdate) -> Self {
        value.options.append_to(
            Self::new()
                .with("courses[0][id]", value.id)
                .with_opt("courses[0][fullname]", value.fullname.as_ref())
                .with_opt("courses[0][shortname]", value.shortname.as_ref())
                .with_opt("courses[0][categoryid]", value.categoryid),
        )
    }
}
