use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::lenient;
use crate::store::Store;

/// Store key holding the serialized affiliate list.
pub const AFFILIATES_KEY: &str = "affiliates";

/// An affiliate as written by the registration flow.
///
/// Keys the dashboard does not know about are kept in `extra` so a write
/// never drops data another page put there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affiliate {
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sales: f64,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub payment_details: String,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub last_payment: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decode a stored affiliate list. A missing key, `null`, or a blob that is
/// not a JSON array yields an empty list; entries that are not objects are
/// skipped.
pub fn parse_list(raw: Option<&str>) -> Vec<Affiliate> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(Value::Null) => return Vec::new(),
        Ok(other) => {
            log::warn!("Stored '{AFFILIATES_KEY}' is not a list (found {}), ignoring", json_kind(&other));
            return Vec::new();
        }
        Err(e) => {
            log::warn!("Stored '{AFFILIATES_KEY}' is not valid JSON, ignoring: {e}");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(pos, entry)| {
            if !entry.is_object() {
                log::warn!("Skipping affiliate at position {pos}: not an object");
                return None;
            }
            serde_json::from_value::<Affiliate>(entry)
                .map_err(|e| log::warn!("Skipping affiliate at position {pos}: {e}"))
                .ok()
        })
        .collect()
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub async fn load_all(store: &Store) -> Result<Vec<Affiliate>, AppError> {
    let raw = store.get_item(AFFILIATES_KEY).await?;
    Ok(parse_list(raw.as_deref()))
}

pub async fn save_all(store: &Store, affiliates: &[Affiliate]) -> Result<(), AppError> {
    let json = serde_json::to_string(affiliates)?;
    store.set_item(AFFILIATES_KEY, &json).await
}

/// Pay out the affiliate at `index`: sales reset to zero and the payment
/// time recorded. Returns the updated record, or `None` when `index` is out
/// of range (nothing is written in that case).
pub async fn process_payment(
    store: &Store,
    index: usize,
    paid_at: DateTime<Utc>,
) -> Result<Option<Affiliate>, AppError> {
    let mut affiliates = load_all(store).await?;
    let Some(affiliate) = affiliates.get_mut(index) else {
        return Ok(None);
    };
    affiliate.sales = 0.0;
    affiliate.last_payment = Some(paid_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true));
    let paid = affiliate.clone();

    save_all(store, &affiliates).await?;
    log::info!("Payment processed for affiliate #{} ({})", index + 1, paid.email);
    Ok(Some(paid))
}

/// Remove the affiliate at `index`. Later positions shift down by one.
pub async fn delete(store: &Store, index: usize) -> Result<Option<Affiliate>, AppError> {
    let mut affiliates = load_all(store).await?;
    if index >= affiliates.len() {
        return Ok(None);
    }
    let removed = affiliates.remove(index);
    save_all(store, &affiliates).await?;
    log::info!("Affiliate #{} ({}) deleted", index + 1, removed.email);
    Ok(Some(removed))
}
