use crate::auth::auth::AuthUser;
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::model::role::Role;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use utoipa::ToSchema;

#[derive(FromRow)]
struct UserSql {
    id: i64,
    name: String,
    email: String,
    password: String,
    role: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@campus.edu")]
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    #[schema(example = "student", value_type = String)]
    pub role: Role,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserSql> for User {
    type Error = AppError;

    fn try_from(row: UserSql) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role).ok_or_else(|| {
            AppError::Database(sqlx::Error::Decode(
                format!("unknown role {:?} for user {}", row.role, row.id).into(),
            ))
        })?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password,
            role,
            created_at: row.created_at,
        })
    }
}

pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

const SELECT_USER: &str = "SELECT id, name, email, password, role, created_at FROM users";

impl User {
    pub async fn create(pool: &SqlitePool, new: NewUser) -> Result<User, AppError> {
        let name = new.name.trim();
        let email = normalize_email(&new.email);

        if name.is_empty() || email.is_empty() || new.password.is_empty() {
            return Err(AppError::validation("Name, email and password are required."));
        }

        if Self::find_by_email(pool, &email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let hashed = hash_password(&new.password)?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(&email)
        .bind(&hashed)
        .bind(new.role.as_ref())
        .bind(Utc::now())
        .execute(pool)
        .await
        .map_err(|e| {
            // lost a race against a concurrent registration
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateEmail;
                }
            }
            AppError::Database(e)
        })?;

        let id = result.last_insert_rowid();
        tracing::info!(user_id = id, role = %new.role, "User created");

        Self::find(pool, id).await?.ok_or(AppError::NotFound("User"))
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserSql>(&format!("{SELECT_USER} WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserSql>(&format!("{SELECT_USER} WHERE email = ?"))
            .bind(normalize_email(email))
            .fetch_optional(pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, UserSql>(&format!("{SELECT_USER} ORDER BY id"))
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    pub async fn list_by_role(pool: &SqlitePool, role: Role) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, UserSql>(&format!("{SELECT_USER} WHERE role = ? ORDER BY id"))
            .bind(role.as_ref())
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    /// Unknown email and wrong password are reported identically.
    pub async fn authenticate(
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let user = Self::find_by_email(pool, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    pub async fn reset_password(
        pool: &SqlitePool,
        email: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AppError> {
        let user = Self::find_by_email(pool, email)
            .await?
            .ok_or(AppError::EmailNotFound)?;

        if new_password != confirm_password {
            return Err(AppError::PasswordMismatch);
        }
        if new_password.is_empty() {
            return Err(AppError::validation("Password must not be empty."));
        }

        let hashed = hash_password(new_password)?;
        sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(&hashed)
            .bind(user.id)
            .execute(pool)
            .await?;

        tracing::info!(user_id = user.id, "Password reset");
        Ok(())
    }

    /// Removes the user together with its leaves and attendance snapshots.
    pub async fn delete(pool: &SqlitePool, actor: &AuthUser, user_id: i64) -> Result<(), AppError> {
        if actor.user_id == user_id {
            return Err(AppError::SelfDelete);
        }

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM leaves WHERE student_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM attendance WHERE student_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            // dropping `tx` rolls back
            return Err(AppError::NotFound("User"));
        }

        tx.commit().await?;
        tracing::info!(user_id, deleted_by = actor.user_id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;

    fn new_user(name: &str, email: &str, role: Role) -> NewUser {
        NewUser {
            name: name.into(),
            email: email.into(),
            password: "pa55word".into(),
            role,
        }
    }

    #[actix_web::test]
    async fn duplicate_email_is_rejected_and_first_user_unchanged() {
        let pool = test_support::pool().await;
        let first = User::create(&pool, new_user("Asha", "asha@campus.edu", Role::Student))
            .await
            .unwrap();

        let err = User::create(&pool, new_user("Impostor", " ASHA@campus.edu ", Role::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        let stored = User::find(&pool, first.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Asha");
        assert_eq!(stored.role, Role::Student);
        assert_eq!(User::list(&pool).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn authenticate_and_reset_password() {
        let pool = test_support::pool().await;
        User::create(&pool, new_user("Ravi", "Ravi@Campus.edu", Role::Faculty))
            .await
            .unwrap();

        let user = User::authenticate(&pool, "ravi@campus.edu", "pa55word")
            .await
            .unwrap();
        assert_eq!(user.role, Role::Faculty);
        assert_ne!(user.password_hash, "pa55word");

        assert!(matches!(
            User::authenticate(&pool, "ravi@campus.edu", "nope").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            User::authenticate(&pool, "ghost@campus.edu", "pa55word").await,
            Err(AppError::InvalidCredentials)
        ));

        assert!(matches!(
            User::reset_password(&pool, "ghost@campus.edu", "a", "a").await,
            Err(AppError::EmailNotFound)
        ));
        assert!(matches!(
            User::reset_password(&pool, "ravi@campus.edu", "a", "b").await,
            Err(AppError::PasswordMismatch)
        ));

        User::reset_password(&pool, "ravi@campus.edu", "fresh", "fresh")
            .await
            .unwrap();
        assert!(User::authenticate(&pool, "ravi@campus.edu", "fresh").await.is_ok());
        assert!(User::authenticate(&pool, "ravi@campus.edu", "pa55word").await.is_err());
    }

    #[actix_web::test]
    async fn create_requires_all_fields() {
        let pool = test_support::pool().await;
        let err = User::create(&pool, new_user("  ", "x@campus.edu", Role::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[actix_web::test]
    async fn delete_cascades_and_refuses_self() {
        let pool = test_support::pool().await;
        let admin = test_support::user(&pool, "Root", "root@campus.edu", Role::Admin).await;
        let student = test_support::user(&pool, "Mina", "mina@campus.edu", Role::Student).await;

        sqlx::query(
            "INSERT INTO leaves (student_id, name, email, days, reason, created_at) VALUES (?, 'Mina', 'mina@campus.edu', 2, 'flu', ?)",
        )
        .bind(student.id)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO attendance (student_id, total_days, present_days, percentage, updated_by, recorded_at) VALUES (?, 10, 9, 90.0, 'Prof', ?)",
        )
        .bind(student.id)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

        let actor = AuthUser::from(&admin);
        assert!(matches!(
            User::delete(&pool, &actor, admin.id).await,
            Err(AppError::SelfDelete)
        ));
        assert!(User::find(&pool, admin.id).await.unwrap().is_some());

        User::delete(&pool, &actor, student.id).await.unwrap();
        assert!(User::find(&pool, student.id).await.unwrap().is_none());

        let leaves: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leaves")
            .fetch_one(&pool)
            .await
            .unwrap();
        let snapshots: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!((leaves, snapshots), (0, 0));

        assert!(matches!(
            User::delete(&pool, &actor, student.id).await,
            Err(AppError::NotFound("User"))
        ));
    }
}
