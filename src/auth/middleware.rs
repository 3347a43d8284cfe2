use crate::auth::auth::AuthUser;
use crate::auth::session::{SESSION_COOKIE, verify_session};
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};

/// Decodes the session cookie once per request. A valid session puts an
/// `AuthUser` into the request extensions; anything else leaves the request
/// anonymous and the role gates turn it away.
pub async fn session_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        match verify_session(cookie.value(), &config.session_secret) {
            Ok(claims) => {
                let auth_user = AuthUser {
                    user_id: claims.user_id,
                    name: claims.sub,
                    role: claims.role,
                };
                req.extensions_mut().insert(auth_user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session cookie");
            }
        }
    }

    next.call(req).await
}
