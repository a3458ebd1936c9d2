use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::Local;
use serde::Deserialize;

use crate::auth::{csrf, session::set_flash};
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::handlers::{CsrfOnly, see_other};
use crate::models::admin_data;
use crate::store::Store;

const SETTINGS_PAGE: &str = "/dashboard/settings";

#[derive(Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub commission_rate: String,
    #[serde(default)]
    pub payout_threshold: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct AnnouncementForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub color: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct LogoForm {
    /// File contents as a data URI, read in the browser.
    #[serde(default)]
    pub logo_data: String,
    pub csrf_token: String,
}

/// Flash a validation message and go back to the settings page; other errors
/// propagate.
fn flash_rejection(session: &Session, result: Result<(), AppError>) -> Result<HttpResponse, AppError> {
    match result {
        Ok(()) => Ok(see_other(SETTINGS_PAGE)),
        Err(AppError::Validation(msg)) => {
            set_flash(session, &msg);
            Ok(see_other(SETTINGS_PAGE))
        }
        Err(e) => Err(e),
    }
}

/// POST /settings: stores the values as entered; commission figures keep
/// using the fixed rate and threshold.
pub async fn save(
    store: web::Data<Store>,
    session: Session,
    form: web::Form<SettingsForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let settings = admin_data::save_settings(&store, &form.commission_rate, &form.payout_threshold).await?;
    log::info!(
        "Settings saved: commissionRate={:?} payoutThreshold={:?}",
        settings.commission_rate,
        settings.payout_threshold
    );
    set_flash(&session, "✅ Paramètres sauvegardés !");
    Ok(see_other(SETTINGS_PAGE))
}

/// POST /settings/logo
pub async fn upload_logo(
    store: web::Data<Store>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<LogoForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let result = admin_data::set_logo(&store, &form.logo_data, config.max_logo_bytes).await;
    if result.is_ok() {
        set_flash(&session, "✅ Logo mis à jour !");
    }
    flash_rejection(&session, result)
}

/// POST /announcements
pub async fn publish_announcement(
    store: web::Data<Store>,
    session: Session,
    form: web::Form<AnnouncementForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let result = admin_data::publish_announcement(&store, &form.text, &form.color, Local::now())
        .await
        .map(|a| {
            log::info!("Announcement {} published", a.id);
            set_flash(&session, "✅ Annonce publiée !");
        });
    flash_rejection(&session, result)
}

/// POST /announcements/{id}/delete
pub async fn delete_announcement(
    store: web::Data<Store>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    if admin_data::delete_announcement(&store, id).await? {
        log::info!("Announcement {id} deleted");
    }
    Ok(see_other(SETTINGS_PAGE))
}
