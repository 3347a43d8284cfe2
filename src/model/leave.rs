use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::attendance::Attendance;
use crate::model::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn status(&self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        }
    }
}

#[derive(FromRow)]
struct LeaveSql {
    id: i64,
    student_id: i64,
    name: String,
    email: String,
    days: i64,
    reason: String,
    document: Option<String>,
    status: String,
    approved_by: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Leave {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 7)]
    pub student_id: i64,
    /// requester name at submission time
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@campus.edu")]
    pub email: String,
    #[schema(example = 2)]
    pub days: i64,
    #[schema(example = "Medical appointment")]
    pub reason: String,
    #[schema(example = "certificate.pdf", nullable = true)]
    pub document: Option<String>,
    pub status: LeaveStatus,
    #[schema(example = "Prof. Rao", nullable = true)]
    pub approved_by: Option<String>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl TryFrom<LeaveSql> for Leave {
    type Error = AppError;

    fn try_from(row: LeaveSql) -> Result<Self, Self::Error> {
        let status = row.status.parse::<LeaveStatus>().map_err(|_| {
            AppError::Database(sqlx::Error::Decode(
                format!("unknown leave status {:?} for leave {}", row.status, row.id).into(),
            ))
        })?;

        Ok(Leave {
            id: row.id,
            student_id: row.student_id,
            name: row.name,
            email: row.email,
            days: row.days,
            reason: row.reason,
            document: row.document,
            status,
            approved_by: row.approved_by,
            created_at: row.created_at,
        })
    }
}

pub struct NewLeave {
    pub days: i64,
    pub reason: String,
    /// stored file name inside the upload directory
    pub document: Option<String>,
}

const SELECT_LEAVE: &str = r#"
    SELECT id, student_id, name, email, days, reason, document, status, approved_by, created_at
    FROM leaves
"#;

/// Checks made before anything (e.g. an upload) is persisted
pub fn validate_request(days: i64, reason: &str) -> Result<(), AppError> {
    if days <= 0 {
        return Err(AppError::validation("Number of days must be a positive number."));
    }
    if reason.trim().is_empty() {
        return Err(AppError::validation("Please give a reason for the leave."));
    }
    Ok(())
}

/// Applying for leave requires `min_attendance` percent current attendance.
pub async fn check_attendance_policy(
    pool: &SqlitePool,
    student_id: i64,
    min_attendance: f64,
) -> Result<f64, AppError> {
    let current = Attendance::current(pool, student_id).await?;
    if current < min_attendance {
        return Err(AppError::AttendanceBelowThreshold {
            current,
            required: min_attendance,
        });
    }
    Ok(current)
}

impl Leave {
    pub async fn submit(
        pool: &SqlitePool,
        student: &AuthUser,
        request: NewLeave,
        min_attendance: f64,
    ) -> Result<Leave, AppError> {
        validate_request(request.days, &request.reason)?;
        check_attendance_policy(pool, student.user_id, min_attendance).await?;

        // name and email are snapshotted from the account at submission time
        let requester = User::find(pool, student.user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        let id = sqlx::query(
            r#"
            INSERT INTO leaves (student_id, name, email, days, reason, document, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(requester.id)
        .bind(&requester.name)
        .bind(&requester.email)
        .bind(request.days)
        .bind(request.reason.trim())
        .bind(&request.document)
        .bind(LeaveStatus::Pending.as_ref())
        .bind(Utc::now())
        .execute(pool)
        .await?
        .last_insert_rowid();

        tracing::info!(leave_id = id, student_id = requester.id, days = request.days, "Leave submitted");

        Self::find(pool, id).await?.ok_or(AppError::NotFound("Leave request"))
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Leave>, AppError> {
        sqlx::query_as::<_, LeaveSql>(&format!("{SELECT_LEAVE} WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(Leave::try_from)
            .transpose()
    }

    pub async fn list_by_student(pool: &SqlitePool, student_id: i64) -> Result<Vec<Leave>, AppError> {
        sqlx::query_as::<_, LeaveSql>(&format!(
            "{SELECT_LEAVE} WHERE student_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(student_id)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Leave::try_from)
        .collect()
    }

    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Leave>, AppError> {
        sqlx::query_as::<_, LeaveSql>(&format!("{SELECT_LEAVE} ORDER BY created_at DESC, id DESC"))
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(Leave::try_from)
            .collect()
    }

    /// Moves a pending leave to Approved or Rejected. Decided leaves never
    /// change again, and nobody decides on their own request.
    pub async fn transition(
        pool: &SqlitePool,
        leave_id: i64,
        decision: Decision,
        actor: &AuthUser,
    ) -> Result<Leave, AppError> {
        let mut tx = pool.begin().await?;

        let leave: Leave = sqlx::query_as::<_, LeaveSql>(&format!("{SELECT_LEAVE} WHERE id = ?"))
            .bind(leave_id)
            .fetch_optional(&mut *tx)
            .await?
            .map(Leave::try_from)
            .transpose()?
            .ok_or(AppError::NotFound("Leave request"))?;

        if leave.student_id == actor.user_id {
            return Err(AppError::SelfApproval);
        }
        if leave.status.is_terminal() {
            return Err(AppError::AlreadyDecided(leave.status));
        }

        let status = decision.status();
        let updated = sqlx::query(
            r#"
            UPDATE leaves
            SET status = ?, approved_by = ?
            WHERE id = ?
            AND status = 'Pending'
            "#,
        )
        .bind(status.as_ref())
        .bind(&actor.name)
        .bind(leave_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::AlreadyDecided(leave.status));
        }

        tx.commit().await?;
        tracing::info!(leave_id, status = %status, decided_by = actor.user_id, "Leave decided");

        Ok(Leave {
            status,
            approved_by: Some(actor.name.clone()),
            ..leave
        })
    }
}
