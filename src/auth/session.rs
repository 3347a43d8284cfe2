use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::models::SessionClaims;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

pub fn issue_session(user: &AuthUser, secret: &str, ttl: usize) -> Result<String, AppError> {
    let claims = SessionClaims {
        user_id: user.user_id,
        sub: user.name.clone(),
        role: user.role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn verify_session(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;

    fn user() -> AuthUser {
        AuthUser {
            user_id: 3,
            name: "Prof. Rao".into(),
            role: Role::Faculty,
        }
    }

    #[test]
    fn session_round_trips_identity() {
        let token = issue_session(&user(), "secret", 60).unwrap();
        let claims = verify_session(&token, "secret").unwrap();
        assert_eq!(claims.user_id, 3);
        assert_eq!(claims.sub, "Prof. Rao");
        assert_eq!(claims.role, Role::Faculty);
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        let token = issue_session(&user(), "secret", 60).unwrap();
        assert!(verify_session(&token, "other-secret").is_err());
        assert!(verify_session("not.a.token", "secret").is_err());
    }

    #[test]
    fn every_session_gets_its_own_id() {
        let a = verify_session(&issue_session(&user(), "s", 60).unwrap(), "s").unwrap();
        let b = verify_session(&issue_session(&user(), "s", 60).unwrap(), "s").unwrap();
        assert_ne!(a.jti, b.jti);
    }
}
