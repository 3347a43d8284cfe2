use crate::model::role::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    #[schema(example = "jane@campus.edu")]
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterForm {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@campus.edu")]
    pub email: String,
    pub password: String,
    #[schema(example = "student")]
    pub role: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ForgotPasswordForm {
    #[schema(example = "jane@campus.edu")]
    pub email: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Contents of the signed session cookie
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    /// display name
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub jti: String,
}
