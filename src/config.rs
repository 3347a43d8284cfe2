use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub server_addr: String,
    pub session_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_reset_per_min: u32,

    pub upload_dir: PathBuf,
    /// Minimum current attendance (percent) a student needs to apply for leave
    pub min_leave_attendance: f64,
    pub mail_sender: String,
    pub log_level: String,

    /// Optional bootstrap admin, created at startup when missing
    pub admin: Option<AdminSeed>,
}

#[derive(Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminSeed {
                name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            session_secret: required("SESSION_SECRET")?,
            session_ttl: parsed_or("SESSION_TTL", 28_800)?, // default 8 hours

            rate_login_per_min: parsed_or("RATE_LOGIN_PER_MIN", 60)?,
            rate_reset_per_min: parsed_or("RATE_RESET_PER_MIN", 30)?,

            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "static/uploads".to_string())
                .into(),
            min_leave_attendance: parsed_or("MIN_LEAVE_ATTENDANCE", 80.0)?,
            mail_sender: env::var("MAIL_SENDER")
                .unwrap_or_else(|_| "no-reply@campus.local".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
            admin,
        })
    }

    #[cfg(test)]
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            session_secret: "test-secret".to_string(),
            server_addr: "127.0.0.1:0".to_string(),
            session_ttl: 3600,
            rate_login_per_min: 1000,
            rate_reset_per_min: 1000,
            upload_dir,
            min_leave_attendance: 80.0,
            mail_sender: "no-reply@campus.test".to_string(),
            log_level: "debug".to_string(),
            admin: None,
        }
    }
}
