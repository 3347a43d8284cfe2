pub mod admin;
pub mod faculty;
pub mod student;

use crate::auth::auth::AuthUser;
use crate::error::{AppError, BackTo, FormRedirect};
use crate::model::attendance::Attendance;
use crate::model::leave::{Decision, Leave};
use crate::utils::flash;
use crate::utils::mailer::{Notifier, notify_decision};
use actix_web::HttpResponse;
use serde::Deserialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

/// Attendance snapshot form shared by faculty and admin. Numbers arrive as
/// text so a bad value becomes a flash instead of a 400.
#[derive(Deserialize, ToSchema)]
pub struct AttendanceForm {
    #[schema(example = "7")]
    pub student_id: String,
    #[schema(example = "20")]
    pub total_days: String,
    #[schema(example = "17")]
    pub present_days: String,
}

fn parse_number(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::validation("Please enter valid numbers for attendance."))
}

pub(crate) async fn record_attendance(
    pool: &SqlitePool,
    form: &AttendanceForm,
    actor: &AuthUser,
    back: &str,
) -> Result<HttpResponse, FormRedirect> {
    let student_id = parse_number(&form.student_id).back_to(back)?;
    let total_days = parse_number(&form.total_days).back_to(back)?;
    let present_days = parse_number(&form.present_days).back_to(back)?;

    let snapshot = Attendance::record(pool, student_id, total_days, present_days, actor)
        .await
        .back_to(back)?;

    Ok(flash::notice(
        back,
        &format!("Attendance updated to {:.2}%.", snapshot.percentage),
    ))
}

/// Approve or reject, then notify the requester. A failed notification is
/// flashed as a warning next to the success message.
pub(crate) async fn decide_leave(
    pool: &SqlitePool,
    notifier: &dyn Notifier,
    leave_id: i64,
    decision: Decision,
    actor: &AuthUser,
    back: &str,
) -> Result<HttpResponse, FormRedirect> {
    let leave = Leave::transition(pool, leave_id, decision, actor)
        .await
        .back_to(back)?;

    let mut messages = vec![match decision {
        Decision::Approve => "Leave approved successfully.".to_string(),
        Decision::Reject => "Leave rejected.".to_string(),
    }];
    if let Some(warning) = notify_decision(notifier, &leave) {
        messages.push(warning);
    }

    Ok(flash::redirect(back, &messages))
}
