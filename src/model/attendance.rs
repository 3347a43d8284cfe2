use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::role::Role;
use crate::model::user::User;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use utoipa::ToSchema;

/// One attendance snapshot. The newest snapshot of a student is its current
/// attendance; older ones are kept as history.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 7)]
    pub student_id: i64,
    #[schema(example = 20)]
    pub total_days: i64,
    #[schema(example = 17)]
    pub present_days: i64,
    #[schema(example = 85.0)]
    pub percentage: f64,
    #[schema(example = "Prof. Rao")]
    pub updated_by: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub recorded_at: DateTime<Utc>,
}

/// Current attendance of one student, 0% when nothing was recorded yet.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentAttendance {
    #[schema(example = 7)]
    pub student_id: i64,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@campus.edu")]
    pub email: String,
    #[schema(example = 85.0)]
    pub percentage: f64,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = Option<String>)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// present / total * 100, rounded to two decimals
pub fn compute_percentage(total_days: i64, present_days: i64) -> Result<f64, AppError> {
    if total_days <= 0 {
        return Err(AppError::validation("Total days must be greater than zero."));
    }
    if present_days < 0 || present_days > total_days {
        return Err(AppError::validation(
            "Present days must be between 0 and total days.",
        ));
    }

    let raw = present_days as f64 / total_days as f64 * 100.0;
    // `{:.2}` rounds the exact binary value, ties to even
    Ok(format!("{raw:.2}").parse().unwrap_or(raw))
}

const SELECT_ATTENDANCE: &str = r#"
    SELECT id, student_id, total_days, present_days, percentage, updated_by, recorded_at
    FROM attendance
"#;

impl Attendance {
    pub async fn record(
        pool: &SqlitePool,
        student_id: i64,
        total_days: i64,
        present_days: i64,
        actor: &AuthUser,
    ) -> Result<Attendance, AppError> {
        Self::record_at(pool, student_id, total_days, present_days, actor, Utc::now()).await
    }

    pub async fn record_at(
        pool: &SqlitePool,
        student_id: i64,
        total_days: i64,
        present_days: i64,
        actor: &AuthUser,
        recorded_at: DateTime<Utc>,
    ) -> Result<Attendance, AppError> {
        let percentage = compute_percentage(total_days, present_days)?;

        match User::find(pool, student_id).await? {
            Some(user) if user.role == Role::Student => {}
            _ => return Err(AppError::NotFound("Student")),
        }

        let id = sqlx::query(
            r#"
            INSERT INTO attendance
                (student_id, total_days, present_days, percentage, updated_by, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(student_id)
        .bind(total_days)
        .bind(present_days)
        .bind(percentage)
        .bind(&actor.name)
        .bind(recorded_at)
        .execute(pool)
        .await?
        .last_insert_rowid();

        tracing::info!(student_id, percentage, updated_by = actor.user_id, "Attendance recorded");

        Ok(Attendance {
            id,
            student_id,
            total_days,
            present_days,
            percentage,
            updated_by: actor.name.clone(),
            recorded_at,
        })
    }

    /// Newest snapshot; ties on the timestamp go to the later insert.
    pub async fn latest(pool: &SqlitePool, student_id: i64) -> Result<Option<Attendance>, AppError> {
        let row = sqlx::query_as::<_, Attendance>(&format!(
            "{SELECT_ATTENDANCE} WHERE student_id = ? ORDER BY recorded_at DESC, id DESC LIMIT 1"
        ))
        .bind(student_id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    pub async fn current(pool: &SqlitePool, student_id: i64) -> Result<f64, AppError> {
        Ok(Self::latest(pool, student_id)
            .await?
            .map(|a| a.percentage)
            .unwrap_or(0.0))
    }

    pub async fn history(pool: &SqlitePool, student_id: i64) -> Result<Vec<Attendance>, AppError> {
        let rows = sqlx::query_as::<_, Attendance>(&format!(
            "{SELECT_ATTENDANCE} WHERE student_id = ? ORDER BY recorded_at DESC, id DESC"
        ))
        .bind(student_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn current_for_all_students(
        pool: &SqlitePool,
    ) -> Result<Vec<StudentAttendance>, AppError> {
        let rows = sqlx::query_as::<_, StudentAttendance>(
            r#"
            SELECT
                u.id AS student_id,
                u.name,
                u.email,
                COALESCE((
                    SELECT a.percentage FROM attendance a
                    WHERE a.student_id = u.id
                    ORDER BY a.recorded_at DESC, a.id DESC LIMIT 1
                ), 0.0) AS percentage,
                (
                    SELECT a.recorded_at FROM attendance a
                    WHERE a.student_id = u.id
                    ORDER BY a.recorded_at DESC, a.id DESC LIMIT 1
                ) AS recorded_at
            FROM users u
            WHERE u.role = 'student'
            ORDER BY u.id
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
