// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

/// Remote procedures exposed by the web service that this client knows how
/// to call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Procedure {
    GetSiteInfo,
    GetUsers,
    GetUsersByField,
    GetUserCourses,
    CreateUsers,
    UpdateUsers,
    DeleteUsers,
    AssignRoles,
    UnassignRoles,
    EnrolUsers,
    AddGroupMembers,
    DeleteGroupMembers,
    GetCategories,
    GetCourses,
    GetContents,
    GetGroups,
    GetCourseGroups,
    CreateGroups,
    GetEnrolledUsers,
    CreateCourses,
    UpdateCourses,
    GetGrades,
    UpdateGrades,
    GetGradingDefinitions,
    GetCalendarEvents,
    CreateCalendarEvents,
    DeleteCalendarEvents,
}

impl Procedure {
    pub const ALL: [Self; 27] = [
        Self::GetSiteInfo,
        Self::GetUsers,
        Self::GetUsersByField,
        Self::GetUserCourses,
        Self::CreateUsers,
        Self::UpdateUsers,
        Self::DeleteUsers,
        Self::AssignRoles,
        Self::UnassignRoles,
        Self::EnrolUsers,
        Self::AddGroupMembers,
        Self::DeleteGroupMembers,
        Self::GetCategories,
        Self::GetCourses,
        Self::GetContents,
        Self::GetGroups,
        Self::GetCourseGroups,
        Self::CreateGroups,
        Self::GetEnrolledUsers,
        Self::CreateCourses,
        Self::UpdateCourses,
        Self::GetGrades,
        Self::UpdateGrades,
        Self::GetGradingDefinitions,
        Self::GetCalendarEvents,
        Self::CreateCalendarEvents,
        Self::DeleteCalendarEvents,
    ];

    /// The function name the backend expects in `wsfunction`.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::GetSiteInfo => "core_webservice_get_site_info",
            Self::GetUsers => "core_user_get_users",
            Self::GetUsersByField => "core_user_get_users_by_field",
            Self::GetUserCourses => "core_enrol_get_users_courses",
            Self::CreateUsers => "core_user_create_users",
            Self::UpdateUsers => "core_user_update_users",
            Self::DeleteUsers => "core_user_delete_users",
            Self::AssignRoles => "core_role_assign_roles",
            Self::UnassignRoles => "core_role_unassign_roles",
            Self::EnrolUsers => "enrol_manual_enrol_users",
            Self::AddGroupMembers => "core_group_add_group_members",
            Self::DeleteGroupMembers => "core_group_delete_group_members",
            Self::GetCategories => "core_course_get_categories",
            Self::GetCourses => "core_course_get_courses",
            Self::GetContents => "core_course_get_contents",
            Self::GetGroups => "core_group_get_groups",
            Self::GetCourseGroups => "core_group_get_course_groups",
            Self::CreateGroups => "core_group_create_groups",
            Self::GetEnrolledUsers => "core_enrol_get_enrolled_users",
            Self::CreateCourses => "core_course_create_courses",
            Self::UpdateCourses => "core_course_update_courses",
            Self::GetGrades => "core_grades_get_grades",
            Self::UpdateGrades => "core_grades_update_grades",
            Self::GetGradingDefinitions => "core_grading_get_definitions",
            Self::GetCalendarEvents => "core_calendar_get_calendar_events",
            Self::CreateCalendarEvents => "core_calendar_create_calendar_events",
            Self::DeleteCalendarEvents => "core_calendar_delete_calendar_events",
        }
    }
}

impl std::fmt::Display for Procedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_procedure_has_a_unique_wire_name() {
        let mut seen = HashSet::new();
        for procedure in Procedure::ALL {
            let name = procedure.wire_name();
            assert!(seen.insert(name), "{name} is mapped twice");
        }
        assert_eq!(seen.len(), Procedure::ALL.len());
    }

    #[test]
    fn wire_names_are_usable_query_values() {
        for procedure in Procedure::ALL {
            let name = procedure.wire_name();
            assert!(!name.is_empty());
            assert!(name.bytes().all(|b| b.is_ascii_lowercase() || b == b'_'));
        }
    }

    #[test]
    fn display_uses_wire_name() {
        assert_eq!(
            Procedure::GetUsersByField.to_string(),
            "core_user_get_users_by_field"
        );
        assert_eq!(
            Procedure::EnrolUsers.to_string(),
            "enrol_manual_enrol_users"
        );
    }
}
