use crate::{
    api::{admin, faculty, student},
    auth::handlers,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::{Result, anyhow};

type Limiter = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiters, built once so every worker shares the same buckets.
#[derive(Clone)]
pub struct RateLimits {
    login: Limiter,
    reset: Limiter,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            login: build_limiter(config.rate_login_per_min)?,
            reset: build_limiter(config.rate_reset_per_min)?,
        })
    }
}

fn build_limiter(requests_per_min: u32) -> Result<Limiter> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} per minute"))
}

pub fn configure(cfg: &mut web::ServiceConfig, limits: RateLimits) {
    // Public routes
    cfg.route("/", web::get().to(handlers::home))
        .service(
            web::resource("/login")
                .wrap(Governor::new(&limits.login))
                .route(web::get().to(handlers::login_page))
                .route(web::post().to(handlers::login)),
        )
        .service(
            web::resource("/register")
                .wrap(Governor::new(&limits.login))
                .route(web::get().to(handlers::register_page))
                .route(web::post().to(handlers::register)),
        )
        .service(
            web::resource("/forgot-password")
                .wrap(Governor::new(&limits.reset))
                .route(web::get().to(handlers::forgot_password_page))
                .route(web::post().to(handlers::forgot_password)),
        )
        .route("/logout", web::get().to(handlers::logout));

    // Student
    cfg.service(
        web::resource("/student")
            .route(web::get().to(student::dashboard))
            .route(web::post().to(student::submit_leave)),
    )
    .route("/leave-status", web::get().to(student::leave_status));

    // Faculty
    cfg.route("/faculty", web::get().to(faculty::dashboard))
        .route("/approve/{id}", web::post().to(faculty::approve_leave))
        .route("/reject/{id}", web::post().to(faculty::reject_leave))
        .service(
            web::resource("/update_attendance")
                .route(web::get().to(faculty::attendance_page))
                .route(web::post().to(faculty::update_attendance)),
        );

    // Admin
    cfg.service(
        web::scope("/admin")
            // /admin
            .service(
                web::resource("")
                    .route(web::get().to(admin::dashboard))
                    .route(web::post().to(admin::create_user)),
            )
            // /admin/leaves
            .service(
                web::resource("/leaves")
                    .route(web::get().to(admin::leaves))
                    .route(web::post().to(admin::decide)),
            )
            // /admin/users
            .service(
                web::resource("/users")
                    .route(web::get().to(admin::users))
                    .route(web::post().to(admin::delete_user)),
            )
            // /admin/attendance
            .service(
                web::resource("/attendance")
                    .route(web::get().to(admin::attendance))
                    .route(web::post().to(admin::update_attendance)),
            )
            .route(
                "/download-attendance-all",
                web::get().to(admin::download_attendance_all),
            )
            .route(
                "/download-attendance/{id}",
                web::get().to(admin::download_attendance),
            )
            .route("/export-users", web::get().to(admin::export_users)),
    );
}
