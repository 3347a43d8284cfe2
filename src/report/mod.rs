//! Read-only PDF exports of the user and attendance ledgers.

pub mod layout;
pub mod pdf;

use crate::model::attendance::{Attendance, StudentAttendance};
use crate::model::user::User;
use actix_web::HttpResponse;
use actix_web::http::header::CONTENT_DISPOSITION;
use chrono::{DateTime, Utc};
use layout::{Column, LEFT_MM, Table};

fn generated_line(now: DateTime<Utc>) -> Option<String> {
    Some(format!("Generated {} UTC", now.format("%Y-%m-%d %H:%M")))
}

fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

pub fn attendance_table(rows: &[StudentAttendance], now: DateTime<Utc>) -> Table {
    Table {
        title: "Student Attendance Report".to_string(),
        subtitle: generated_line(now),
        columns: vec![
            Column {
                header: "ID",
                x_mm: LEFT_MM,
                max_chars: 6,
            },
            Column {
                header: "Name",
                x_mm: 35.0,
                max_chars: 28,
            },
            Column {
                header: "Email",
                x_mm: 100.0,
                max_chars: 34,
            },
            Column {
                header: "Attendance",
                x_mm: 172.0,
                max_chars: 8,
            },
        ],
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    r.student_id.to_string(),
                    r.name.clone(),
                    r.email.clone(),
                    percent(r.percentage),
                ]
            })
            .collect(),
    }
}

pub fn student_history_table(student: &User, history: &[Attendance], now: DateTime<Utc>) -> Table {
    Table {
        title: format!("Attendance of {} ({})", student.name, student.email),
        subtitle: generated_line(now),
        columns: vec![
            Column {
                header: "Recorded",
                x_mm: LEFT_MM,
                max_chars: 16,
            },
            Column {
                header: "Present",
                x_mm: 55.0,
                max_chars: 8,
            },
            Column {
                header: "Total",
                x_mm: 80.0,
                max_chars: 8,
            },
            Column {
                header: "Attendance",
                x_mm: 105.0,
                max_chars: 8,
            },
            Column {
                header: "Updated by",
                x_mm: 140.0,
                max_chars: 26,
            },
        ],
        rows: history
            .iter()
            .map(|a| {
                vec![
                    a.recorded_at.format("%Y-%m-%d %H:%M").to_string(),
                    a.present_days.to_string(),
                    a.total_days.to_string(),
                    percent(a.percentage),
                    a.updated_by.clone(),
                ]
            })
            .collect(),
    }
}

pub fn users_table(users: &[User], now: DateTime<Utc>) -> Table {
    Table {
        title: "User Accounts".to_string(),
        subtitle: generated_line(now),
        columns: vec![
            Column {
                header: "ID",
                x_mm: LEFT_MM,
                max_chars: 6,
            },
            Column {
                header: "Name",
                x_mm: 35.0,
                max_chars: 28,
            },
            Column {
                header: "Email",
                x_mm: 100.0,
                max_chars: 34,
            },
            Column {
                header: "Role",
                x_mm: 172.0,
                max_chars: 8,
            },
        ],
        rows: users
            .iter()
            .map(|u| {
                vec![
                    u.id.to_string(),
                    u.name.clone(),
                    u.email.clone(),
                    u.role.to_string(),
                ]
            })
            .collect(),
    }
}

pub fn report_filename(kind: &str, now: DateTime<Utc>) -> String {
    format!("{kind}_{}_UTC.pdf", now.format("%Y%m%d_%H%M%S"))
}

pub fn attachment(filename: &str, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(bytes)
}
