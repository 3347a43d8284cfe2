use crate::api::faculty::AttendanceOverview;
use crate::api::{AttendanceForm, decide_leave, record_attendance};
use crate::auth::auth::AdminUser;
use crate::error::{AppError, BackTo, FormRedirect};
use crate::model::attendance::Attendance;
use crate::model::leave::{Decision, Leave, LeaveStatus};
use crate::model::role::Role;
use crate::model::user::{NewUser, User};
use crate::models::RegisterForm;
use crate::report;
use crate::utils::flash::{self, Flash};
use crate::utils::mailer::Notifier;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::ToSchema;

const DASHBOARD: &str = "/admin";
const LEAVES: &str = "/admin/leaves";
const USERS: &str = "/admin/users";
const ATTENDANCE: &str = "/admin/attendance";

#[derive(Serialize, ToSchema)]
pub struct AdminDashboard {
    #[schema(example = "Administrator")]
    pub name: String,
    pub students: usize,
    pub faculty: usize,
    pub admins: usize,
    pub pending_leaves: usize,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListView {
    pub leaves: Vec<Leave>,
}

#[derive(Serialize, ToSchema)]
pub struct UserListView {
    pub users: Vec<User>,
}

#[derive(Deserialize, ToSchema)]
pub struct LeaveDecisionForm {
    #[schema(example = "12")]
    pub leave_id: String,
    #[schema(example = "approve")]
    pub action: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteUserForm {
    #[schema(example = "7")]
    pub user_id: String,
}

fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid {what} id.")))
}

#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Account and leave counts", body = AdminDashboard),
        (status = 303, description = "Not signed in as admin; redirect to /login")
    ),
    security(("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    auth: AdminUser,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> Result<HttpResponse, AppError> {
    let students = User::list_by_role(pool.get_ref(), Role::Student).await?.len();
    let faculty = User::list_by_role(pool.get_ref(), Role::Faculty).await?.len();
    let admins = User::list_by_role(pool.get_ref(), Role::Admin).await?.len();
    let pending_leaves = Leave::list_all(pool.get_ref())
        .await?
        .iter()
        .filter(|l| l.status == LeaveStatus::Pending)
        .count();

    Ok(flash.render(AdminDashboard {
        name: auth.name.clone(),
        students,
        faculty,
        admins,
        pending_leaves,
    }))
}

/// Creates an account of any role
pub async fn create_user(
    _auth: AdminUser,
    pool: web::Data<SqlitePool>,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse, FormRedirect> {
    let form = form.into_inner();
    let role = Role::parse(&form.role)
        .ok_or_else(|| AppError::validation("Please choose a valid role."))
        .back_to(DASHBOARD)?;

    let user = User::create(
        pool.get_ref(),
        NewUser {
            name: form.name,
            email: form.email,
            password: form.password,
            role,
        },
    )
    .await
    .back_to(DASHBOARD)?;

    Ok(flash::notice(
        DASHBOARD,
        &format!("User {} created as {}.", user.email, user.role),
    ))
}

#[utoipa::path(
    get,
    path = "/admin/leaves",
    responses(
        (status = 200, description = "All leave requests, newest first", body = LeaveListView),
        (status = 303, description = "Not signed in as admin; redirect to /login")
    ),
    security(("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn leaves(
    _auth: AdminUser,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> Result<HttpResponse, AppError> {
    let leaves = Leave::list_all(pool.get_ref()).await?;
    Ok(flash.render(LeaveListView { leaves }))
}

pub async fn decide(
    auth: AdminUser,
    pool: web::Data<SqlitePool>,
    notifier: web::Data<dyn Notifier>,
    form: web::Form<LeaveDecisionForm>,
) -> Result<HttpResponse, FormRedirect> {
    let leave_id = parse_id(&form.leave_id, "leave").back_to(LEAVES)?;
    let decision: Decision = form
        .action
        .trim()
        .parse()
        .map_err(|_| AppError::validation("Unknown action; use approve or reject."))
        .back_to(LEAVES)?;

    decide_leave(
        pool.get_ref(),
        notifier.get_ref(),
        leave_id,
        decision,
        &auth,
        LEAVES,
    )
    .await
}

#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All accounts", body = UserListView),
        (status = 303, description = "Not signed in as admin; redirect to /login")
    ),
    security(("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn users(
    _auth: AdminUser,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> Result<HttpResponse, AppError> {
    let users = User::list(pool.get_ref()).await?;
    Ok(flash.render(UserListView { users }))
}

pub async fn delete_user(
    auth: AdminUser,
    pool: web::Data<SqlitePool>,
    form: web::Form<DeleteUserForm>,
) -> Result<HttpResponse, FormRedirect> {
    let user_id = parse_id(&form.user_id, "user").back_to(USERS)?;

    User::delete(pool.get_ref(), &auth, user_id)
        .await
        .back_to(USERS)?;

    Ok(flash::notice(USERS, "User deleted successfully."))
}

#[utoipa::path(
    get,
    path = "/admin/attendance",
    responses(
        (status = 200, description = "Current attendance of every student", body = AttendanceOverview),
        (status = 303, description = "Not signed in as admin; redirect to /login")
    ),
    security(("session_cookie" = [])),
    tag = "Admin"
)]
pub async fn attendance(
    _auth: AdminUser,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> Result<HttpResponse, AppError> {
    let students = Attendance::current_for_all_students(pool.get_ref()).await?;
    Ok(flash.render(AttendanceOverview { students }))
}

pub async fn update_attendance(
    auth: AdminUser,
    pool: web::Data<SqlitePool>,
    form: web::Form<AttendanceForm>,
) -> Result<HttpResponse, FormRedirect> {
    record_attendance(pool.get_ref(), &form, &auth, ATTENDANCE).await
}

#[utoipa::path(
    get,
    path = "/admin/download-attendance/{id}",
    params(("id" = i64, Path, description = "Student whose history is exported")),
    responses(
        (status = 200, description = "PDF attachment", content_type = "application/pdf"),
        (status = 404, description = "No such student")
    ),
    security(("session_cookie" = [])),
    tag = "Reports"
)]
pub async fn download_attendance(
    _auth: AdminUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();
    let student = match User::find(pool.get_ref(), student_id).await? {
        Some(user) if user.role == Role::Student => user,
        _ => return Err(AppError::NotFound("Student")),
    };
    let history = Attendance::history(pool.get_ref(), student_id).await?;

    let now = Utc::now();
    let bytes = report::pdf::render(&report::student_history_table(&student, &history, now))?;
    tracing::info!(student_id, rows = history.len(), "Student attendance exported");

    Ok(report::attachment(
        &report::report_filename(&format!("attendance_student_{student_id}"), now),
        bytes,
    ))
}

#[utoipa::path(
    get,
    path = "/admin/download-attendance-all",
    responses((status = 200, description = "PDF attachment", content_type = "application/pdf")),
    security(("session_cookie" = [])),
    tag = "Reports"
)]
pub async fn download_attendance_all(
    _auth: AdminUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let rows = Attendance::current_for_all_students(pool.get_ref()).await?;

    let now = Utc::now();
    let bytes = report::pdf::render(&report::attendance_table(&rows, now))?;
    tracing::info!(rows = rows.len(), "Attendance report exported");

    Ok(report::attachment(
        &report::report_filename("attendance_report", now),
        bytes,
    ))
}

#[utoipa::path(
    get,
    path = "/admin/export-users",
    responses((status = 200, description = "PDF attachment", content_type = "application/pdf")),
    security(("session_cookie" = [])),
    tag = "Reports"
)]
pub async fn export_users(
    _auth: AdminUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let users = User::list(pool.get_ref()).await?;

    let now = Utc::now();
    let bytes = report::pdf::render(&report::users_table(&users, now))?;
    tracing::info!(rows = users.len(), "User list exported");

    Ok(report::attachment(&report::report_filename("users", now), bytes))
}
