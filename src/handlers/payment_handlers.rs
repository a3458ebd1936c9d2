use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::auth::{csrf, session::set_flash};
use crate::errors::AppError;
use crate::handlers::{CsrfOnly, see_other};
use crate::models::affiliate;
use crate::store::Store;

const PAYMENTS_PAGE: &str = "/dashboard/payments";

/// POST /payments/{index}/process
pub async fn process(
    store: web::Data<Store>,
    session: Session,
    path: web::Path<usize>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    if let Some(paid) = affiliate::process_payment(&store, path.into_inner(), Utc::now()).await? {
        set_flash(&session, &format!("✅ Paiement effectué pour {}", paid.full_name));
    }
    Ok(see_other(PAYMENTS_PAGE))
}

/// POST /payments/calculate: recompute the payable list.
pub async fn calculate(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    set_flash(&session, "🧮 Calcul des paiements terminé !");
    Ok(see_other(PAYMENTS_PAGE))
}
