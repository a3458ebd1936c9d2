use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::{csrf, session};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::handlers::{CsrfOnly, see_other};
use crate::templates_structs::{APP_NAME, LoginTemplate};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

fn login_template(session: &Session, error: Option<&str>, username: &str) -> LoginTemplate {
    LoginTemplate {
        error: error.map(str::to_string),
        app_name: APP_NAME.to_string(),
        csrf_token: csrf::get_or_create_token(session),
        username: username.to_string(),
    }
}

pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    // Already logged in: straight to the dashboard
    if session::is_logged_in(&session) {
        return Ok(see_other("/dashboard"));
    }
    render(login_template(&session, None, ""))
}

pub async fn login_submit(
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    if !config.check_credentials(&form.username, &form.password)? {
        log::warn!("Failed admin login for '{}'", form.username.trim());
        return render(login_template(
            &session,
            Some("Identifiant ou mot de passe incorrect"),
            &form.username,
        ));
    }

    session::sign_in(&session, form.username.trim())?;
    log::info!("Admin '{}' logged in", form.username.trim());
    Ok(see_other("/dashboard"))
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session::sign_out(&session);
    Ok(see_other("/login"))
}
