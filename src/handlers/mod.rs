use actix_web::HttpResponse;
use serde::Deserialize;

pub mod affiliate_handlers;
pub mod auth_handlers;
pub mod dashboard;
pub mod payment_handlers;
pub mod settings_handlers;

/// Form body carrying only the CSRF token (row action buttons).
#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location.to_string()))
        .finish()
}
