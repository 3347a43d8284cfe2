use crate::config::AdminSeed;
use crate::error::AppError;
use crate::model::role::Role;
use crate::model::user::{NewUser, User};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn init_db(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

/// Creates the configured admin account unless the email is already registered.
pub async fn seed_admin(pool: &SqlitePool, seed: &AdminSeed) -> Result<bool, AppError> {
    if User::find_by_email(pool, &seed.email).await?.is_some() {
        return Ok(false);
    }

    let admin = User::create(
        pool,
        NewUser {
            name: seed.name.clone(),
            email: seed.email.clone(),
            password: seed.password.clone(),
            role: Role::Admin,
        },
    )
    .await?;

    info!(user_id = admin.id, "Bootstrap admin created");
    Ok(true)
}
