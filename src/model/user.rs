// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;

use crate::query::Params;

use super::{Group, TextFormat, Warning};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub fullname: String,
    pub email: String,
    pub department: String,
    pub firstaccess: i64,
    pub lastaccess: i64,
    pub description: String,
    pub descriptionformat: TextFormat,
    pub profileimageurlsmall: String,
    pub profileimageurl: String,
    pub country: String,
    pub customfields: Vec<CustomField>,
    pub preferences: Vec<Preference>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CustomField {
    #[serde(rename = "type")]
    pub type_: String,
    pub value: String,
    pub name: String,
    pub shortname: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Preference {
    pub name: String,
    pub value: String,
}

/// Result of a criteria search over user accounts.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserSearch {
    pub users: Vec<User>,
    pub warnings: Vec<Warning>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CreatedUser {
    pub id: i64,
    pub username: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnrolledUser {
    pub id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub fullname: String,
    pub email: String,
    pub department: String,
    pub firstaccess: i64,
    pub lastaccess: i64,
    pub description: String,
    pub descriptionformat: TextFormat,
    pub city: String,
    pub country: String,
    pub profileimageurlsmall: String,
    pub profileimageurl: String,
    pub groups: Vec<Group>,
    pub roles: Vec<Role>,
    pub enrolledcourses: Vec<EnrolledCourse>,
    pub preferences: Vec<Preference>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Role {
    pub roleid: i64,
    pub name: String,
    pub shortname: String,
    pub sortorder: i64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnrolledCourse {
    pub id: i64,
    pub fullname: String,
    pub shortname: String,
}

/// Optional account attributes shared by user creation and update.
#[derive(Clone, Debug, Default)]
pub struct UserProfile {
    pub auth: Option<String>,
    pub idnumber: Option<String>,
    pub lang: Option<String>,
    pub calendartype: Option<String>,
    pub theme: Option<String>,
    pub timezone: Option<String>,
    pub mailformat: Option<i64>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub firstnamephonetic: Option<String>,
    pub lastnamephonetic: Option<String>,
    pub middlename: Option<String>,
    pub alternatename: Option<String>,
    /// `(type, value)` pairs.
    pub preferences: Vec<(String, String)>,
    /// `(type, value)` pairs.
    pub customfields: Vec<(String, String)>,
}

impl UserProfile {
    fn append_to(&self, params: Params) -> Params {
        params
            .with_opt("users[0][auth]", self.auth.as_ref())
            .with_opt("users[0][idnumber]", self.idnumber.as_ref())
            .with_opt("users[0][lang]", self.lang.as_ref())
            .with_opt("users[0][calendartype]", self.calendartype.as_ref())
            .with_opt("users[0][theme]", self.theme.as_ref())
            .with_opt("users[0][timezone]", self.timezone.as_ref())
            .with_opt("users[0][mailformat]", self.mailformat)
            .with_opt("users[0][description]", self.description.as_ref())
            .with_opt("users[0][city]", self.city.as_ref())
            .with_opt("users[0][country]", self.country.as_ref())
            .with_opt("users[0][firstnamephonetic]", self.firstnamephonetic.as_ref())
            .with_opt("users[0][lastnamephonetic]", self.lastnamephonetic.as_ref())
            .with_opt("users[0][middlename]", self.middlename.as_ref())
            .with_opt("users[0][alternatename]", self.alternatename.as_ref())
            .with_column(
                "users[0][preferences]",
                "type",
                self.preferences.iter().map(|(t, _)| t),
            )
            .with_column(
                "users[0][preferences]",
                "value",
                self.preferences.iter().map(|(_, v)| v),
            )
            .with_column(
                "users[0][customfields]",
                "type",
                self.customfields.iter().map(|(t, _)| t),
            )
            .with_column(
                "users[0][customfields]",
                "value",
                self.customfields.iter().map(|(_, v)| v),
            )
    }
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password: SecretString,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub profile: UserProfile,
}

impl From<&NewUser> for Params {
    fn from(value: &NewUser) -> Self {
        value.profile.append_to(
            Self::new()
                .with("users[0][username]", &value.username)
                .with("users[0][password]", value.password.expose_secret())
                .with("users[0][firstname]", &value.firstname)
                .with("users[0][lastname]", &value.lastname)
                .with("users[0][email]", &value.email),
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub id: i64,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub profile: UserProfile,
}

impl From<&UserUpdate> for Params {
    fn from(value: &UserUpdate) -> Self {
        value.profile.append_to(
            Self::new()
                .with("users[0][id]", value.id)
                .with_opt("users[0][username]", value.username.as_ref())
                .with_opt(
                    "users[0][password]",
                    value.password.as_ref().map(|p| p.expose_secret().as_str()),
                )
                .with_opt("users[0][firstname]", value.firstname.as_ref())
                .with_opt("users[0][lastname]", value.lastname.as_ref())
                .with_opt("users[0][email]", value.email.as_ref()),
        )
    }
}

/// A manual role (un)assignment. The context is given either by id or by
/// level plus instance id.
#[derive(Clone, Debug, Default)]
pub struct RoleAssignment {
    pub roleid: i64,
    pub userid: i64,
    pub contextid: Option<i64>,
    pub contextlevel: Option<String>,
    pub instanceid: Option<i64>,
}

impl RoleAssignment {
    pub(crate) fn to_params(&self, record: &str) -> Params {
        Params::new()
            .with(format!("{record}[0][roleid]"), self.roleid)
            .with(format!("{record}[0][userid]"), self.userid)
            .with_opt(format!("{record}[0][contextid]"), self.contextid)
            .with_opt(format!("{record}[0][contextlevel]"), self.contextlevel.as_ref())
            .with_opt(format!("{record}[0][instanceid]"), self.instanceid)
    }
}

/// A manual enrolment. Times are Unix timestamps.
#[derive(Clone, Debug, Default)]
pub struct Enrolment {
    pub roleid: i64,
    pub userid: i64,
    pub courseid: i64,
    pub timestart: Option<i64>,
    pub timeend: Option<i64>,
    pub suspend: Option<bool>,
}

impl From<&Enrolment> for Params {
    fn from(value: &Enrolment) -> Self {
        Self::new()
            .with("enrolments[0][roleid]", value.roleid)
            .with("enrolments[0][userid]", value.userid)
            .with("enrolments[0][courseid]", value.courseid)
            .with_opt("enrolments[0][timestart]", value.timestart)
            .with_opt("enrolments[0][timeend]", value.timeend)
            .with_opt("enrolments[0][suspend]", value.suspend)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Result;

    use super::*;

    fn keys(params: &Params) -> Vec<&str> {
        params.iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn new_user_sends_each_profile_field_under_its_own_key() {
        let user = NewUser {
            username: "jdoe".to_owned(),
            password: SecretString::new("Passw0rd!".to_owned()),
            firstname: "Jane".to_owned(),
            lastname: "Doe".to_owned(),
            email: "jdoe@example.org".to_owned(),
            profile: UserProfile {
                auth: Some("manual".to_owned()),
                city: Some("Lisbon".to_owned()),
                lang: Some(String::new()),
                preferences: vec![("auth_forcepasswordchange".to_owned(), "1".to_owned())],
                ..UserProfile::default()
            },
        };
        let params = Params::from(&user);

        assert_eq!(
            keys(&params),
            [
                "users[0][username]",
                "users[0][password]",
                "users[0][firstname]",
                "users[0][lastname]",
                "users[0][email]",
                "users[0][auth]",
                "users[0][city]",
                "users[0][preferences][0][type]",
                "users[0][preferences][0][value]",
            ]
        );
    }

    #[test]
    fn user_update_only_sends_changed_fields() {
        let update = UserUpdate {
            id: 12,
            email: Some("new@example.org".to_owned()),
            ..UserUpdate::default()
        };
        let params = Params::from(&update);
        let rendered: Vec<_> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();

        assert_eq!(
            rendered,
            ["users[0][id]=12", "users[0][email]=new@example.org"]
        );
    }

    #[test]
    fn role_assignment_uses_the_given_record_name() {
        let assignment = RoleAssignment {
            roleid: 5,
            userid: 9,
            contextlevel: Some("course".to_owned()),
            instanceid: Some(3),
            ..RoleAssignment::default()
        };

        assert_eq!(
            keys(&assignment.to_params("unassignments")),
            [
                "unassignments[0][roleid]",
                "unassignments[0][userid]",
                "unassignments[0][contextlevel]",
                "unassignments[0][instanceid]",
            ]
        );
    }

    #[test]
    fn enrolment_flags_render_as_integers() {
        let enrolment = Enrolment {
            roleid: 5,
            userid: 9,
            courseid: 2,
            suspend: Some(false),
            ..Enrolment::default()
        };
        let rendered: Vec<_> = Params::from(&enrolment)
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();

        assert_eq!(
            rendered,
            [
                "enrolments[0][roleid]=5",
                "enrolments[0][userid]=9",
                "enrolments[0][courseid]=2",
                "enrolments[0][suspend]=0",
            ]
        );
    }

    #[test]
    fn enrolled_user_tolerates_missing_fields() -> Result<()> {
        let user: EnrolledUser = serde_json::from_str(
            r#"{"id":4,"fullname":"Jane Doe","roles":[{"roleid":5,"shortname":"student"}]}"#,
        )?;
        assert_eq!(user.id, 4);
        assert_eq!(user.roles[0].shortname, "student");
        assert!(user.groups.is_empty());
        assert_eq!(user.descriptionformat, TextFormat::Moodle);
        Ok(())
    }
}
