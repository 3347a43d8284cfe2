use crate::model::leave::LeaveStatus;
use crate::utils::flash;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use std::fmt;
use thiserror::Error;

const GENERIC_MESSAGE: &str = "Something went wrong, Contact with system admin";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("You are not authorized to view this page.")]
    Unauthorized,

    #[error("Email already exists!")]
    DuplicateEmail,

    #[error("Email not found!")]
    EmailNotFound,

    #[error("Invalid email or password!")]
    InvalidCredentials,

    #[error("Passwords do not match!")]
    PasswordMismatch,

    #[error("You cannot delete your own account.")]
    SelfDelete,

    #[error("You cannot approve or reject your own leave request.")]
    SelfApproval,

    #[error("This leave request has already been {0}.")]
    AlreadyDecided(LeaveStatus),

    #[error(
        "Your attendance is {current:.2}%. At least {required:.2}% attendance is required to apply for leave."
    )]
    AttendanceBelowThreshold { current: f64, required: f64 },

    #[error("{0} not found.")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("report rendering failed: {0}")]
    Report(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Failures of the store or of an external collaborator, never shown verbatim
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::Migration(_)
                | AppError::Hashing(_)
                | AppError::Token(_)
                | AppError::Report(_)
                | AppError::Io(_)
        )
    }

    /// Message safe to flash back to the user
    pub fn user_message(&self) -> String {
        if self.is_internal() {
            GENERIC_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    fn log(&self) {
        if self.is_internal() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::PasswordMismatch
            | AppError::SelfDelete
            | AppError::SelfApproval
            | AppError::AttendanceBelowThreshold { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::SEE_OTHER,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail | AppError::AlreadyDecided(_) => StatusCode::CONFLICT,
            AppError::EmailNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.log();

        // authorization failures always land on the login form
        if matches!(self, AppError::Unauthorized) {
            return flash::redirect("/login", &[self.user_message()]);
        }

        HttpResponse::build(self.status_code()).json(json!({
            "message": self.user_message()
        }))
    }
}

/// An error raised by a form submission, answered with a redirect back to the
/// form and the message as a flash.
#[derive(Debug)]
pub struct FormRedirect {
    location: String,
    error: AppError,
}

impl FormRedirect {
    pub fn new(location: impl Into<String>, error: AppError) -> Self {
        Self {
            location: location.into(),
            error,
        }
    }
}

impl fmt::Display for FormRedirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (redirect to {})", self.error, self.location)
    }
}

impl ResponseError for FormRedirect {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        self.error.log();

        let location = match self.error {
            AppError::Unauthorized => "/login",
            _ => self.location.as_str(),
        };
        flash::redirect(location, &[self.error.user_message()])
    }
}

pub trait BackTo<T> {
    /// Turn a domain failure into a redirect to `location`
    fn back_to(self, location: &str) -> Result<T, FormRedirect>;
}

impl<T> BackTo<T> for Result<T, AppError> {
    fn back_to(self, location: &str) -> Result<T, FormRedirect> {
        self.map_err(|e| FormRedirect::new(location, e))
    }
}
