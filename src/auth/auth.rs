use crate::{error::AppError, model::role::Role, model::user::User};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};
use std::marker::PhantomData;
use std::ops::Deref;

/// Identity of the signed-in user, placed in request extensions by the
/// session middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub name: String,
    pub role: Role,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        AuthUser {
            user_id: user.id,
            name: user.name.clone(),
            role: user.role,
        }
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or(AppError::Unauthorized),
        )
    }
}

impl AuthUser {
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

pub trait RoleGate {
    const ROLE: Role;
}

pub struct StudentGate;
pub struct FacultyGate;
pub struct AdminGate;

impl RoleGate for StudentGate {
    const ROLE: Role = Role::Student;
}
impl RoleGate for FacultyGate {
    const ROLE: Role = Role::Faculty;
}
impl RoleGate for AdminGate {
    const ROLE: Role = Role::Admin;
}

/// Extractor that only succeeds for sessions holding exactly `G::ROLE`.
pub struct Gated<G: RoleGate> {
    pub user: AuthUser,
    _gate: PhantomData<G>,
}

impl<G: RoleGate> Deref for Gated<G> {
    type Target = AuthUser;

    fn deref(&self) -> &AuthUser {
        &self.user
    }
}

impl<G: RoleGate> FromRequest for Gated<G> {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
            .and_then(|user| {
                user.require_role(G::ROLE)?;
                Ok(Gated {
                    user,
                    _gate: PhantomData,
                })
            });

        if let Err(e) = &result {
            tracing::debug!(error = %e, path = %req.path(), required = %G::ROLE, "Role gate refused request");
        }
        ready(result)
    }
}

pub type StudentUser = Gated<StudentGate>;
pub type FacultyUser = Gated<FacultyGate>;
pub type AdminUser = Gated<AdminGate>;
