use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::auth::{csrf, session::set_flash};
use crate::errors::AppError;
use crate::handlers::{CsrfOnly, see_other};
use crate::models::affiliate;
use crate::models::dashboard::{EXPORT_FILENAME, export_csv};
use crate::store::Store;

const AFFILIATES_PAGE: &str = "/dashboard/affiliates";

/// GET /affiliates/{index}/edit: editing is not available yet; says so.
pub async fn edit(
    session: Session,
    path: web::Path<usize>,
) -> Result<HttpResponse, AppError> {
    let index = path.into_inner();
    set_flash(
        &session,
        &format!("✏️ Édition de l'affilié #{} (fonctionnalité avancée)", index.saturating_add(1)),
    );
    Ok(see_other(AFFILIATES_PAGE))
}

/// POST /affiliates/{index}/delete: the form asks for confirmation before
/// submitting.
pub async fn delete(
    store: web::Data<Store>,
    session: Session,
    path: web::Path<usize>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    if affiliate::delete(&store, path.into_inner()).await?.is_some() {
        set_flash(&session, "✅ Affilié supprimé");
    }
    Ok(see_other(AFFILIATES_PAGE))
}

/// GET /affiliates/export: CSV download of the whole list.
pub async fn export(
    store: web::Data<Store>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let affiliates = affiliate::load_all(&store).await?;

    let Some(csv) = export_csv(&affiliates) else {
        set_flash(&session, "❌ Aucune donnée à exporter");
        return Ok(see_other(AFFILIATES_PAGE));
    };

    log::info!("Exported {} affiliates to CSV", affiliates.len());
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{EXPORT_FILENAME}\""),
        ))
        .body(csv))
}
