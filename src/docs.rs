use crate::api::admin::{
    AdminDashboard, DeleteUserForm, LeaveDecisionForm, LeaveListView, UserListView,
};
use crate::api::faculty::{AttendanceOverview, FacultyDashboard};
use crate::api::student::{LeaveStatusView, StudentDashboard};
use crate::api::AttendanceForm;
use crate::model::attendance::{Attendance, StudentAttendance};
use crate::model::leave::{Decision, Leave, LeaveStatus};
use crate::model::user::User;
use crate::models::{ForgotPasswordForm, LoginForm, RegisterForm};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus Leave & Attendance",
        version = "0.1.0",
        description = r#"
## Leave and attendance management

Three roles share one service:

- **Students** apply for leave (only with at least the configured attendance, 80% by default) and follow its status
- **Faculty** approve or reject leave requests and record attendance
- **Admins** manage accounts, see every leave and attendance record, and export PDF reports

### Sessions
Signing in through `POST /login` sets an HttpOnly `session` cookie. Views answer with JSON
that includes any pending `messages`; form submissions answer with a `303` redirect.
Requests without the right role are redirected to `/login`.
"#,
    ),
    paths(
        crate::api::student::dashboard,
        crate::api::student::leave_status,

        crate::api::faculty::dashboard,
        crate::api::faculty::attendance_page,

        crate::api::admin::dashboard,
        crate::api::admin::leaves,
        crate::api::admin::users,
        crate::api::admin::attendance,
        crate::api::admin::download_attendance,
        crate::api::admin::download_attendance_all,
        crate::api::admin::export_users
    ),
    components(
        schemas(
            StudentDashboard,
            LeaveStatusView,
            FacultyDashboard,
            AttendanceOverview,
            AdminDashboard,
            LeaveListView,
            UserListView,
            LeaveDecisionForm,
            DeleteUserForm,
            AttendanceForm,
            LoginForm,
            RegisterForm,
            ForgotPasswordForm,
            Leave,
            LeaveStatus,
            Decision,
            Attendance,
            StudentAttendance,
            User
        )
    ),
    modifiers(&SessionCookie),
    tags(
        (name = "Student", description = "Student views"),
        (name = "Faculty", description = "Leave review and attendance entry"),
        (name = "Admin", description = "Account and record administration"),
        (name = "Reports", description = "PDF exports"),
    )
)]
pub struct ApiDoc;

struct SessionCookie;

impl Modify for SessionCookie {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session"))),
            );
        }
    }
}
