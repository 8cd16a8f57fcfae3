// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

use super::{TextFormat, Warning};

/// Grade items of an activity (or a whole course) and, optionally, the
/// grades students got for them.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Grades {
    pub items: Vec<GradeItem>,
    pub outcomes: Vec<GradeOutcome>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GradeItem {
    pub activityid: String,
    pub itemnumber: i64,
    pub scaleid: i64,
    pub name: String,
    pub grademin: f64,
    pub grademax: f64,
    pub gradepass: f64,
    pub locked: bool,
    pub hidden: bool,
    pub grades: Vec<Grade>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GradeOutcome {
    pub activityid: String,
    pub itemnumber: i64,
    pub scaleid: i64,
    pub name: String,
    pub locked: bool,
    pub hidden: bool,
    pub grades: Vec<Grade>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Grade {
    pub userid: i64,
    pub grade: Option<f64>,
    pub locked: bool,
    pub hidden: bool,
    pub overridden: i64,
    pub feedback: String,
    pub feedbackformat: TextFormat,
    pub usermodified: i64,
    pub datesubmitted: Option<i64>,
    pub dategraded: Option<i64>,
    pub str_grade: String,
    pub str_long_grade: String,
    pub str_feedback: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GradingDefinitions {
    pub areas: Vec<GradingArea>,
    pub warnings: Vec<Warning>,
}

/// A gradable area of a course module and its advanced grading forms.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GradingArea {
    pub cmid: i64,
    pub contextid: i64,
    pub component: String,
    pub areaname: String,
    pub activemethod: Option<String>,
    pub definitions: Vec<GradingDefinition>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GradingDefinition {
    pub id: i64,
    pub method: String,
    pub name: String,
    pub description: String,
    pub descriptionformat: TextFormat,
    pub status: i64,
    pub copiedfromid: Option<i64>,
    pub timecreated: i64,
    pub usercreated: i64,
    pub timemodified: i64,
    pub usermodified: i64,
    pub timecopied: i64,
}

#[cfg(test)]
mod tests {
    use crate::error::Result;

    use super::*;

    #[test]
    fn ungraded_students_have_no_grade() -> Result<()> {
        let grades: Grades = serde_json::from_str(
            r#"{"items":[{"activityid":"12","name":"Quiz 1","grademax":10.0,"grades":[
                {"userid":3,"grade":7.5,"str_grade":"7.50"},
                {"userid":4,"grade":null,"str_grade":"-"}
            ]}],"outcomes":[]}"#,
        )?;
        let item = &grades.items[0];
        assert_eq!(item.activityid, "12");
        assert_eq!(item.grades[0].grade, Some(7.5));
        assert_eq!(item.grades[1].grade, None);
        Ok(())
    }
}
