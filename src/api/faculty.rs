use crate::api::{AttendanceForm, decide_leave, record_attendance};
use crate::auth::auth::FacultyUser;
use crate::error::{AppError, FormRedirect};
use crate::model::attendance::{Attendance, StudentAttendance};
use crate::model::leave::{Decision, Leave};
use crate::utils::flash::Flash;
use crate::utils::mailer::Notifier;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

const DASHBOARD: &str = "/faculty";
const ATTENDANCE_FORM: &str = "/update_attendance";

#[derive(Serialize, ToSchema)]
pub struct FacultyDashboard {
    #[schema(example = "Prof. Rao")]
    pub name: String,
    pub leaves: Vec<Leave>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceOverview {
    pub students: Vec<StudentAttendance>,
}

#[utoipa::path(
    get,
    path = "/faculty",
    responses(
        (status = 200, description = "All leave requests, newest first", body = FacultyDashboard),
        (status = 303, description = "Not signed in as faculty; redirect to /login")
    ),
    security(("session_cookie" = [])),
    tag = "Faculty"
)]
pub async fn dashboard(
    auth: FacultyUser,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> Result<HttpResponse, AppError> {
    let leaves = Leave::list_all(pool.get_ref()).await?;

    Ok(flash.render(FacultyDashboard {
        name: auth.name.clone(),
        leaves,
    }))
}

pub async fn approve_leave(
    auth: FacultyUser,
    pool: web::Data<SqlitePool>,
    notifier: web::Data<dyn Notifier>,
    path: web::Path<i64>,
) -> Result<HttpResponse, FormRedirect> {
    decide_leave(
        pool.get_ref(),
        notifier.get_ref(),
        path.into_inner(),
        Decision::Approve,
        &auth,
        DASHBOARD,
    )
    .await
}

pub async fn reject_leave(
    auth: FacultyUser,
    pool: web::Data<SqlitePool>,
    notifier: web::Data<dyn Notifier>,
    path: web::Path<i64>,
) -> Result<HttpResponse, FormRedirect> {
    decide_leave(
        pool.get_ref(),
        notifier.get_ref(),
        path.into_inner(),
        Decision::Reject,
        &auth,
        DASHBOARD,
    )
    .await
}

#[utoipa::path(
    get,
    path = "/update_attendance",
    responses(
        (status = 200, description = "Students with their current attendance", body = AttendanceOverview),
        (status = 303, description = "Not signed in as faculty; redirect to /login")
    ),
    security(("session_cookie" = [])),
    tag = "Faculty"
)]
pub async fn attendance_page(
    _auth: FacultyUser,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> Result<HttpResponse, AppError> {
    let students = Attendance::current_for_all_students(pool.get_ref()).await?;
    Ok(flash.render(AttendanceOverview { students }))
}

pub async fn update_attendance(
    auth: FacultyUser,
    pool: web::Data<SqlitePool>,
    form: web::Form<AttendanceForm>,
) -> Result<HttpResponse, FormRedirect> {
    record_attendance(pool.get_ref(), &form, &auth, ATTENDANCE_FORM).await
}
