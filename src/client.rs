// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, warn};
use secrecy::{ExposeSecret as _, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::Result,
    model::{
        Ack, Category, Course, CourseStub, CourseUpdate, CreatedCourse, CreatedUser, EnrolledUser,
        Enrolment, EventBatch, EventDeletionBatch, Events, Grades, GradingDefinitions, Group,
        GroupBatch, NewCourse, NewUser, RoleAssignment, Section, SiteInfo, User, UserCourse,
        UserSearch, UserUpdate,
    },
    procedure::Procedure,
    query::{self, Format, Params},
    response::{self, AuthResult, Response, TokenResponse},
    session::{Credentials, Session, State},
    transport::{HttpTransport, Transport},
};

/// Typed access to the web service functions of a single site.
///
/// The client holds the site URL and, once [`Moodle::login`] succeeds, the
/// token every other call is made with. Calls are independent of each other
/// and may run concurrently; the session is only locked while a request URL
/// is assembled.
#[derive(Debug)]
pub struct Moodle<T = HttpTransport> {
    transport: T,
    session: RwLock<Session>,
}

impl Moodle<HttpTransport> {
    /// Connect to `host` over HTTPS with the default transport.
    pub fn connect(host: &str) -> Result<Self> {
        Self::with_host(HttpTransport::new()?, host)
    }
}

impl<T: Transport> Moodle<T> {
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            session: RwLock::new(Session::new()),
        }
    }

    pub fn with_host(transport: T, host: &str) -> Result<Self> {
        let client = Self::new(transport);
        client.set_host(host)?;
        Ok(client)
    }

    fn session(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn session_mut(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Point the client at another site. Any token already obtained is kept.
    pub fn set_host(&self, host: &str) -> Result<()> {
        self.session_mut().set_host(host)
    }

    pub fn host(&self) -> Option<Url> {
        self.session().host().ok().cloned()
    }

    pub fn state(&self) -> State {
        self.session().state()
    }

    /// Exchange credentials for a token.
    ///
    /// A rejected login is reported in the result rather than as an error,
    /// and leaves a token from an earlier login in place.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResult> {
        let url = {
            let session = self.session();
            query::login_url(session.host()?, credentials)?
        };

        debug!(
            "Requesting a token for {} from service {} at {}",
            credentials.username,
            credentials.service,
            url.origin().ascii_serialization()
        );
        let body = self.transport.get(url).await?;

        match response::parse_token(&body)? {
            TokenResponse::Issued(token) => {
                self.session_mut()
                    .authenticate(SecretString::new(token.token));
                debug!("Logged in as {}", credentials.username);
                Ok(AuthResult::success())
            }
            TokenResponse::Rejected(error) => {
                warn!("Login for {} was rejected: {error}", credentials.username);
                Ok(AuthResult::failure(error))
            }
        }
    }

    async fn call<R>(&self, procedure: Procedure, params: Params) -> Result<Response<R>>
    where
        R: DeserializeOwned + Default,
    {
        let url = {
            let session = self.session();
            let token = session.token()?;
            query::call_url(
                session.host()?,
                procedure,
                token.expose_secret(),
                Format::Json,
                &params,
            )?
        };

        debug!("Calling {procedure}");
        let body = self.transport.get(url).await?;

        let response = response::parse(&body)?;
        if let Response::Failure(ref error) = response {
            debug!("{procedure} failed: {error}");
        }
        Ok(response)
    }

    /// Information about the site and the logged in user. `service` limits
    /// the reported functions to those of one service.
    pub async fn get_site_info(&self, service: Option<&str>) -> Result<Response<SiteInfo>> {
        let params = Params::new().with_opt("serviceshortnames[0]", service);
        self.call(Procedure::GetSiteInfo, params).await
    }

    /// Search users by `(key, value)` criteria, all of which must match.
    pub async fn get_users(&self, criteria: &[(&str, &str)]) -> Result<Response<UserSearch>> {
        let params = criteria
            .iter()
            .enumerate()
            .fold(Params::new(), |params, (i, &(key, value))| {
                params
                    .with(format!("criteria[{i}][key]"), key)
                    .with(format!("criteria[{i}][value]"), value)
            });
        self.call(Procedure::GetUsers, params).await
    }

    pub async fn get_users_by_field(&self, field: &str, values: &[&str]) -> Result<Response<User>> {
        let params = Params::new()
            .with("field", field)
            .with_list("values", values.iter().copied());
        self.call(Procedure::GetUsersByField, params).await
    }

    /// Courses `user_id` is enrolled in.
    pub async fn get_user_courses(&self, user_id: i64) -> Result<Response<UserCourse>> {
        let params = Params::new().with("userid", user_id);
        self.call(Procedure::GetUserCourses, params).await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<Response<CreatedUser>> {
        self.call(Procedure::CreateUsers, user.into()).await
    }

    pub async fn update_user(&self, user: &UserUpdate) -> Result<Response<Ack>> {
        self.call(Procedure::UpdateUsers, user.into()).await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<Response<Ack>> {
        let params = Params::new().with_list("userids", [user_id]);
        self.call(Procedure::DeleteUsers, params).await
    }

    pub async fn assign_role(&self, assignment: &RoleAssignment) -> Result<Response<Ack>> {
        self.call(Procedure::AssignRoles, assignment.to_params("assignments"))
            .await
    }

    pub async fn unassign_role(&self, assignment: &RoleAssignment) -> Result<Response<Ack>> {
        self.call(Procedure::UnassignRoles, assignment.to_params("unassignments"))
            .await
    }

    pub async fn enrol_user(&self, enrolment: &Enrolment) -> Result<Response<Ack>> {
        self.call(Procedure::EnrolUsers, enrolment.into()).await
    }

    pub async fn add_group_member(&self, group_id: i64, user_id: i64) -> Result<Response<Ack>> {
        self.call(Procedure::AddGroupMembers, membership(group_id, user_id))
            .await
    }

    pub async fn delete_group_member(&self, group_id: i64, user_id: i64) -> Result<Response<Ack>> {
        self.call(Procedure::DeleteGroupMembers, membership(group_id, user_id))
            .await
    }

    /// Categories matching `key = value`, e.g. `("parent", "0")` for the top
    /// level.
    pub async fn get_categories(
        &self,
        key: &str,
        value: &str,
        include_subcategories: bool,
    ) -> Result<Response<Category>> {
        let params = Params::new()
            .with("criteria[0][key]", key)
            .with("criteria[0][value]", value)
            .with_unless("addsubcategories", include_subcategories.into(), 1);
        self.call(Procedure::GetCategories, params).await
    }

    /// Courses by id. No ids means every course.
    pub async fn get_courses(&self, ids: &[i64]) -> Result<Response<Course>> {
        let params = Params::new().with_list("options[ids]", ids);
        self.call(Procedure::GetCourses, params).await
    }

    /// Sections of a course along with the modules in each.
    pub async fn get_contents(&self, course_id: i64) -> Result<Response<Section>> {
        let params = Params::new().with("courseid", course_id);
        self.call(Procedure::GetContents, params).await
    }

    pub async fn get_group(&self, group_id: i64) -> Result<Response<Group>> {
        self.get_groups(&[group_id]).await
    }

    pub async fn get_groups(&self, group_ids: &[i64]) -> Result<Response<Group>> {
        let params = Params::new().with_list("groupids", group_ids);
        self.call(Procedure::GetGroups, params).await
    }

    pub async fn get_course_groups(&self, course_id: i64) -> Result<Response<Group>> {
        let params = Params::new().with("courseid", course_id);
        self.call(Procedure::GetCourseGroups, params).await
    }

    pub async fn create_groups(&self, groups: &GroupBatch) -> Result<Response<Group>> {
        self.call(Procedure::CreateGroups, groups.into()).await
    }

    pub async fn get_enrolled_users(&self, course_id: i64) -> Result<Response<EnrolledUser>> {
        let params = Params::new().with("courseid", course_id);
        self.call(Procedure::GetEnrolledUsers, params).await
    }

    pub async fn create_course(&self, course: &NewCourse) -> Result<Response<CreatedCourse>> {
        self.call(Procedure::CreateCourses, course.into()).await
    }

    pub async fn create_courses(&self, courses: &[CourseStub]) -> Result<Response<CreatedCourse>> {
        self.call(Procedure::CreateCourses, CourseStub::to_params(courses))
            .await
    }

    pub async fn update_course(&self, course: &CourseUpdate) -> Result<Response<Ack>> {
        self.call(Procedure::UpdateCourses, course.into()).await
    }

    /// Grade items of a course. `component` and `activity_id` narrow the
    /// result to a single activity, e.g. `("mod_assign", Some(cmid))`.
    pub async fn get_grades(
        &self,
        course_id: i64,
        component: Option<&str>,
        activity_id: Option<i64>,
        user_ids: &[i64],
    ) -> Result<Response<Grades>> {
        let params = Params::new()
            .with("courseid", course_id)
            .with_opt("component", component)
            .with_opt("activityid", activity_id)
            .with_list("userids", user_ids);
        self.call(Procedure::GetGrades, params).await
    }

    pub async fn get_grading_definitions(
        &self,
        cmids: &[i64],
        area_name: Option<&str>,
        active_only: bool,
    ) -> Result<Response<GradingDefinitions>> {
        let params = Params::new()
            .with_list("cmids", cmids)
            .with_opt("areaname", area_name)
            .with("activeonly", active_only);
        self.call(Procedure::GetGradingDefinitions, params).await
    }

    /// Calendar events visible to the user, restricted to the given groups,
    /// courses and event ids.
    pub async fn get_calendar_events(
        &self,
        group_ids: &[i64],
        course_ids: &[i64],
        event_ids: &[i64],
    ) -> Result<Response<Events>> {
        let params = Params::new()
            .with_list("events[groupids]", group_ids)
            .with_list("events[courseids]", course_ids)
            .with_list("events[eventids]", event_ids);
        self.call(Procedure::GetCalendarEvents, params).await
    }

    pub async fn create_calendar_events(&self, events: &EventBatch) -> Result<Response<Events>> {
        self.call(Procedure::CreateCalendarEvents, events.into())
            .await
    }

    pub async fn delete_calendar_events(
        &self,
        events: &EventDeletionBatch,
    ) -> Result<Response<Events>> {
        self.call(Procedure::DeleteCalendarEvents, events.into())
            .await
    }
}

fn membership(group_id: i64, user_id: i64) -> Params {
    Params::new()
        .with("members[0][groupid]", group_id)
        .with("members[0][userid]", user_id)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        io,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use futures_util::future;
    use secrecy::SecretString;

    use crate::{
        error::{Config, Error, Result},
        model::TextFormat,
    };

    use super::*;

    const HOST: &str = "https://lms.example.edu/moodle";

    /// Replays canned bodies in order and records every URL it was asked
    /// for. Running out of bodies is a refused connection.
    #[derive(Default)]
    struct Replay {
        bodies: Mutex<VecDeque<&'static str>>,
        requests: Mutex<Vec<Url>>,
    }

    impl Replay {
        fn new<I: IntoIterator<Item = &'static str>>(bodies: I) -> Arc<Self> {
            Arc::new(Self {
                bodies: Mutex::new(bodies.into_iter().collect()),
                requests: Mutex::default(),
            })
        }

        fn requests(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|u| u.as_str().to_owned())
                .collect()
        }
    }

    #[async_trait]
    impl Transport for Replay {
        async fn get(&self, url: Url) -> Result<String> {
            self.requests.lock().unwrap().push(url);
            match self.bodies.lock().unwrap().pop_front() {
                Some(body) => Ok(body.to_owned()),
                None => Err(io::Error::from(io::ErrorKind::ConnectionRefused).into()),
            }
        }
    }

    fn credentials(password: &str) -> Credentials {
        Credentials::new("alice", SecretString::new(password.to_owned()))
    }

    async fn logged_in(bodies: &[&'static str]) -> Result<(Moodle<Arc<Replay>>, Arc<Replay>)> {
        let replay = Replay::new(
            std::iter::once(r#"{"token":"t0k3n","privatetoken":null}"#)
                .chain(bodies.iter().copied()),
        );
        let client = Moodle::with_host(Arc::clone(&replay), HOST)?;
        assert!(client.login(&credentials("pw")).await?.succeeded);
        Ok((client, replay))
    }

    #[tokio::test]
    async fn anonymous_calls_never_reach_the_transport() -> Result<()> {
        let replay = Replay::new([]);
        let client = Moodle::with_host(Arc::clone(&replay), HOST)?;

        let err = client.get_site_info(None).await.unwrap_err();
        assert!(matches!(err, Error::Config(Config::TokenNotSet)));
        assert!(replay.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn login_requires_a_host() {
        let replay = Replay::new([r#"{"token":"t0k3n"}"#]);
        let client = Moodle::new(Arc::clone(&replay));

        let err = client.login(&credentials("pw")).await.unwrap_err();
        assert!(matches!(err, Error::Config(Config::HostNotSet)));
        assert!(replay.requests().is_empty());
        assert_eq!(client.state(), State::Anonymous);
    }

    #[tokio::test]
    async fn login_issues_one_token_request() -> Result<()> {
        let (client, replay) = logged_in(&[]).await?;

        assert_eq!(client.state(), State::Authenticated);
        assert_eq!(
            replay.requests(),
            ["https://lms.example.edu/moodle/login/token.php?username=alice&password=pw&service=moodle_mobile_app"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn logging_in_again_replaces_the_token() -> Result<()> {
        let (client, replay) = logged_in(&[r#"{"token":"fr35h"}"#, "null"]).await?;

        assert!(client.login(&credentials("pw")).await?.succeeded);
        assert_eq!(client.state(), State::Authenticated);

        client.delete_user(5).await?;
        assert!(replay.requests()[2].contains("wstoken=fr35h&"));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_login_keeps_the_earlier_token() -> Result<()> {
        let (client, replay) = logged_in(&[
            r#"{"error":"Invalid login, please try again","errorcode":"invalidlogin"}"#,
            "null",
        ])
        .await?;

        let result = client.login(&credentials("wrong")).await?;
        assert!(!result.succeeded);
        assert_eq!(
            result.error.and_then(|e| e.errorcode).as_deref(),
            Some("invalidlogin")
        );
        assert_eq!(client.state(), State::Authenticated);

        client.delete_user(5).await?;
        assert!(replay.requests()[2].contains("wstoken=t0k3n&"));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_first_login_stays_anonymous() -> Result<()> {
        let replay = Replay::new([r#"{"error":"Invalid login","errorcode":"invalidlogin"}"#]);
        let client = Moodle::with_host(Arc::clone(&replay), HOST)?;

        assert!(!client.login(&credentials("wrong")).await?.succeeded);
        assert_eq!(client.state(), State::Anonymous);
        Ok(())
    }

    #[tokio::test]
    async fn site_info_request_and_decoding() -> Result<()> {
        let (client, replay) = logged_in(&[
            r#"{"sitename":"Example University","username":"alice","userid":2,"release":"4.3"}"#,
        ])
        .await?;

        match client.get_site_info(Some("moodle_mobile_app")).await? {
            Response::Success(info) => {
                assert_eq!(info.sitename, "Example University");
                assert_eq!(info.userid, 2);
            }
            other => panic!("unexpected response {other:?}"),
        }
        assert_eq!(
            replay.requests()[1],
            "https://lms.example.edu/moodle/webservice/rest/server.php?wstoken=t0k3n\
             &wsfunction=core_webservice_get_site_info&moodlewsrestformat=json\
             &serviceshortnames[0]=moodle_mobile_app"
        );
        Ok(())
    }

    #[tokio::test]
    async fn arrays_are_decoded_element_wise() -> Result<()> {
        let (client, _) = logged_in(&[
            r#"[{"id":3,"username":"bob","fullname":"Bob B"},{"id":4,"username":"carol"}]"#,
        ])
        .await?;

        let users = client
            .get_enrolled_users(7)
            .await?
            .into_items()
            .unwrap_or_default();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].username, "carol");
        Ok(())
    }

    #[tokio::test]
    async fn backend_failures_are_responses() -> Result<()> {
        let (client, _) = logged_in(&[
            r#"{"exception":"webservice_access_exception","errorcode":"accessexception","message":"Access control exception"}"#,
        ])
        .await?;

        let response = client.get_courses(&[]).await?;
        assert!(!response.is_success());
        assert_eq!(
            response.error().and_then(|e| e.errorcode.as_deref()),
            Some("accessexception")
        );
        Ok(())
    }

    #[tokio::test]
    async fn malformed_bodies_are_payload_errors() -> Result<()> {
        let (client, _) = logged_in(&["<html>Maintenance</html>"]).await?;
        assert!(client.get_contents(2).await.unwrap_err().is_payload());
        Ok(())
    }

    #[tokio::test]
    async fn transport_errors_pass_through() -> Result<()> {
        let (client, _) = logged_in(&[]).await?;
        assert!(client.get_course_groups(2).await.unwrap_err().is_transport());
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent() -> Result<()> {
        let (client, replay) = logged_in(&[r#"[{"id":1}]"#, r#"[{"id":1}]"#]).await?;

        let (a, b) = future::join(client.get_group(1), client.get_groups(&[1, 2])).await;
        assert!(a?.is_success());
        assert!(b?.is_success());
        assert_eq!(replay.requests().len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn procedures_use_their_own_wire_names() -> Result<()> {
        let (client, replay) = logged_in(&["null", "null", "null"]).await?;

        client.delete_user(9).await?;
        client
            .unassign_role(&RoleAssignment {
                roleid: 5,
                userid: 9,
                contextlevel: Some("course".to_owned()),
                instanceid: Some(2),
                ..RoleAssignment::default()
            })
            .await?;
        client.get_categories("parent", "0", true).await?;

        let requests = replay.requests();
        assert!(requests[1].contains("wsfunction=core_user_delete_users&"));
        assert!(requests[1].ends_with("&userids[0]=9"));
        assert!(requests[2].contains("wsfunction=core_role_unassign_roles&"));
        assert!(requests[2].ends_with(
            "&unassignments[0][roleid]=5&unassignments[0][userid]=9\
             &unassignments[0][contextlevel]=course&unassignments[0][instanceid]=2"
        ));
        assert!(requests[3].ends_with("&criteria[0][key]=parent&criteria[0][value]=0"));
        Ok(())
    }

    #[tokio::test]
    async fn optional_grade_filters_are_left_out() -> Result<()> {
        let (client, replay) = logged_in(&[r#"{"items":[],"outcomes":[]}"#]).await?;

        client
            .get_grades(2, Some("mod_quiz"), None, &[3, 4])
            .await?;
        assert!(replay.requests()[1].ends_with(
            "&courseid=2&component=mod_quiz&userids[0]=3&userids[1]=4"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn event_batches_are_sent_column_by_column() -> Result<()> {
        let (client, replay) = logged_in(&[r#"{"events":[],"warnings":[]}"#]).await?;

        let batch = EventBatch {
            names: vec!["Exam".to_owned(), "Lab".to_owned()],
            courseids: vec![2],
            formats: vec![TextFormat::Html, TextFormat::Plain],
            ..EventBatch::default()
        };
        client.create_calendar_events(&batch).await?;

        assert!(replay.requests()[1].ends_with(
            "&events[0][name]=Exam&events[1][name]=Lab&events[0][courseid]=2\
             &events[0][format]=1&events[1][format]=2"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn values_are_form_encoded_on_the_wire() -> Result<()> {
        let (client, replay) = logged_in(&["[]"]).await?;

        client.get_users(&[("lastname", "van Dijk")]).await?;
        assert!(replay.requests()[1].ends_with("&criteria[0][value]=van+Dijk"));
        Ok(())
    }

    fn pairs(request: &str) -> Result<Vec<(String, String)>> {
        Ok(Url::parse(request)?
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect())
    }

    #[tokio::test]
    async fn reserved_characters_cannot_inject_parameters() -> Result<()> {
        let (client, replay) = logged_in(&["[]"]).await?;

        client
            .get_users(&[("lastname", "Smith & Sons#1+x&wsfunction=core_user_delete_users")])
            .await?;

        let request = &replay.requests()[1];
        assert_eq!(Url::parse(request)?.fragment(), None);
        let pairs = pairs(request)?;
        let functions: Vec<_> = pairs.iter().filter(|(k, _)| k == "wsfunction").collect();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].1, "core_user_get_users");
        assert_eq!(
            pairs.last().map(|(k, v)| (k.as_str(), v.as_str())),
            Some((
                "criteria[0][value]",
                "Smith & Sons#1+x&wsfunction=core_user_delete_users"
            ))
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_sends_passwords_with_reserved_characters_intact() -> Result<()> {
        let replay = Replay::new([r#"{"token":"t0k3n"}"#]);
        let client = Moodle::with_host(Arc::clone(&replay), HOST)?;

        assert!(client.login(&credentials("Pa#ss+1&x")).await?.succeeded);

        let request = &replay.requests()[0];
        assert_eq!(Url::parse(request)?.fragment(), None);
        assert_eq!(
            pairs(request)?,
            [
                ("username".to_owned(), "alice".to_owned()),
                ("password".to_owned(), "Pa#ss+1&x".to_owned()),
                ("service".to_owned(), "moodle_mobile_app".to_owned()),
            ]
        );
        Ok(())
    }
}
