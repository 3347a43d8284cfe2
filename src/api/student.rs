use crate::auth::auth::StudentUser;
use crate::config::Config;
use crate::error::{AppError, BackTo, FormRedirect};
use crate::model::attendance::Attendance;
use crate::model::leave::{Leave, NewLeave, check_attendance_policy, validate_request};
use crate::utils::flash::{self, Flash};
use crate::utils::upload::store_document;
use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

const DASHBOARD: &str = "/student";

#[derive(Serialize, ToSchema)]
pub struct StudentDashboard {
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// current attendance in percent
    #[schema(example = 85.0)]
    pub attendance: f64,
    #[schema(example = 80.0)]
    pub min_leave_attendance: f64,
    pub can_apply: bool,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveStatusView {
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub leaves: Vec<Leave>,
}

#[derive(MultipartForm)]
pub struct LeaveUpload {
    pub days: Text<String>,
    pub reason: Text<String>,
    #[multipart(limit = "10MB")]
    pub document: Option<TempFile>,
}

#[utoipa::path(
    get,
    path = "/student",
    responses(
        (status = 200, description = "Student dashboard", body = StudentDashboard),
        (status = 303, description = "Not signed in as a student; redirect to /login")
    ),
    security(("session_cookie" = [])),
    tag = "Student"
)]
pub async fn dashboard(
    auth: StudentUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    flash: Flash,
) -> Result<HttpResponse, AppError> {
    let attendance = Attendance::current(pool.get_ref(), auth.user_id).await?;

    Ok(flash.render(StudentDashboard {
        name: auth.name.clone(),
        attendance,
        min_leave_attendance: config.min_leave_attendance,
        can_apply: attendance >= config.min_leave_attendance,
    }))
}

/// Leave application (multipart: `days`, `reason`, optional `document`)
pub async fn submit_leave(
    auth: StudentUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    MultipartForm(form): MultipartForm<LeaveUpload>,
) -> Result<HttpResponse, FormRedirect> {
    let days: i64 = form.days.trim().parse().map_err(|_| {
        FormRedirect::new(
            DASHBOARD,
            AppError::validation("Please enter a valid number for days."),
        )
    })?;
    validate_request(days, &form.reason).back_to(DASHBOARD)?;

    // refuse before the upload touches the disk
    check_attendance_policy(pool.get_ref(), auth.user_id, config.min_leave_attendance)
        .await
        .back_to(DASHBOARD)?;

    let document = match form.document {
        Some(file) => {
            let upload_dir = config.upload_dir.clone();
            web::block(move || {
                store_document(&upload_dir, file.file_name.as_deref(), file.file.path())
            })
            .await
            .map_err(|e| {
                FormRedirect::new(DASHBOARD, AppError::Io(std::io::Error::other(e.to_string())))
            })?
            .back_to(DASHBOARD)?
        }
        None => None,
    };

    Leave::submit(
        pool.get_ref(),
        &auth,
        NewLeave {
            days,
            reason: form.reason.0,
            document,
        },
        config.min_leave_attendance,
    )
    .await
    .back_to(DASHBOARD)?;

    Ok(flash::notice(DASHBOARD, "Leave application submitted!"))
}

#[utoipa::path(
    get,
    path = "/leave-status",
    responses(
        (status = 200, description = "Own leave requests, newest first", body = LeaveStatusView),
        (status = 303, description = "Not signed in as a student; redirect to /login")
    ),
    security(("session_cookie" = [])),
    tag = "Student"
)]
pub async fn leave_status(
    auth: StudentUser,
    pool: web::Data<SqlitePool>,
    flash: Flash,
) -> Result<HttpResponse, AppError> {
    let leaves = Leave::list_by_student(pool.get_ref(), auth.user_id).await?;

    Ok(flash.render(LeaveStatusView {
        name: auth.name.clone(),
        leaves,
    }))
}
