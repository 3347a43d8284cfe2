use crate::{
    auth::{
        auth::AuthUser,
        session::{clear_session_cookie, issue_session, session_cookie},
    },
    config::Config,
    error::{AppError, BackTo, FormRedirect},
    model::role::Role,
    model::user::{NewUser, User},
    models::{ForgotPasswordForm, LoginForm, RegisterForm},
    utils::flash::{self, Flash},
};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

pub async fn home() -> impl Responder {
    flash::redirect("/login", &[])
}

pub async fn login_page(flash: Flash, auth: Option<AuthUser>) -> impl Responder {
    flash.render(json!({
        "page": "login",
        "signed_in_as": auth.map(|a| json!({ "name": a.name, "role": a.role })),
    }))
}

#[instrument(
    name = "auth_login",
    skip(pool, config, form),
    fields(email = %form.email)
)]
pub async fn login(
    form: web::Form<LoginForm>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, FormRedirect> {
    info!("Login request received");

    if form.email.trim().is_empty() || form.password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(FormRedirect::new(
            "/login",
            AppError::validation("Email and password are required."),
        ));
    }

    debug!("Verifying credentials");
    let user = User::authenticate(pool.get_ref(), &form.email, &form.password)
        .await
        .back_to("/login")?;

    let auth_user = AuthUser::from(&user);
    let token = issue_session(&auth_user, &config.session_secret, config.session_ttl)
        .back_to("/login")?;

    info!(user_id = user.id, role = %user.role, "Login successful");

    Ok(flash::redirect_builder(user.role.dashboard(), &[])
        .cookie(session_cookie(token))
        .finish())
}

pub async fn register_page(flash: Flash) -> impl Responder {
    flash.render(json!({
        "page": "register",
        "roles": [Role::Student, Role::Faculty],
    }))
}

/// Self-registration; admin accounts are only created from the admin area.
pub async fn register(
    form: web::Form<RegisterForm>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, FormRedirect> {
    let form = form.into_inner();

    let role = match Role::parse(&form.role) {
        Some(Role::Admin) => {
            return Err(FormRedirect::new(
                "/register",
                AppError::validation("Admin accounts can only be created by an administrator."),
            ));
        }
        Some(role) => role,
        None => {
            return Err(FormRedirect::new(
                "/register",
                AppError::validation("Please choose a valid role."),
            ));
        }
    };

    User::create(
        pool.get_ref(),
        NewUser {
            name: form.name,
            email: form.email,
            password: form.password,
            role,
        },
    )
    .await
    .back_to("/register")?;

    Ok(flash::notice("/login", "Registration successful! Please login."))
}

pub async fn forgot_password_page(flash: Flash) -> impl Responder {
    flash.render(json!({ "page": "forgot-password" }))
}

pub async fn forgot_password(
    form: web::Form<ForgotPasswordForm>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, FormRedirect> {
    User::reset_password(
        pool.get_ref(),
        &form.email,
        &form.new_password,
        &form.confirm_password,
    )
    .await
    .back_to("/forgot-password")?;

    Ok(flash::notice("/login", "Password reset successful! Please login."))
}

pub async fn logout(auth: Option<AuthUser>) -> impl Responder {
    if let Some(user) = auth {
        info!(user_id = user.user_id, "Logout");
    }

    flash::redirect_builder("/login", &["You have been logged out successfully.".to_string()])
        .cookie(clear_session_cookie())
        .finish()
}
