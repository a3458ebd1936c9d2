use actix_web::{middleware::from_fn, web};

use crate::auth::middleware::require_auth;
use crate::handlers::{
    affiliate_handlers, auth_handlers, dashboard, payment_handlers, settings_handlers,
};

/// Register every dashboard route. The caller supplies `web::Data<Store>`,
/// `web::Data<AppConfig>` and the session middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        // Root redirect
        .route("/", web::get().to(|| async { crate::handlers::see_other("/dashboard") }))
        // Protected routes
        .service(
            web::scope("")
                .wrap(from_fn(require_auth))
                .route("/logout", web::post().to(auth_handlers::logout))
                // Section navigation
                .route("/dashboard", web::get().to(dashboard::index))
                .route("/dashboard/{section}", web::get().to(dashboard::section))
                // Affiliates: /affiliates/export BEFORE /affiliates/{index}/...
                .route("/affiliates/export", web::get().to(affiliate_handlers::export))
                .route("/affiliates/{index}/edit", web::get().to(affiliate_handlers::edit))
                .route("/affiliates/{index}/delete", web::post().to(affiliate_handlers::delete))
                // Payments
                .route("/payments/calculate", web::post().to(payment_handlers::calculate))
                .route("/payments/{index}/process", web::post().to(payment_handlers::process))
                // Settings & announcements
                .route("/settings", web::post().to(settings_handlers::save))
                .route("/settings/logo", web::post().to(settings_handlers::upload_logo))
                .route("/announcements", web::post().to(settings_handlers::publish_announcement))
                .route(
                    "/announcements/{id}/delete",
                    web::post().to(settings_handlers::delete_announcement),
                ),
        );
}
