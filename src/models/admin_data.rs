use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::lenient;
use crate::store::Store;

/// Store key holding the admin settings/announcements/logo record.
pub const ADMIN_DATA_KEY: &str = "adminData";
/// Logo shipped with the site; a stored logo equal to this is not shown as custom.
pub const DEFAULT_LOGO: &str = "images/logo.png";
pub const DEFAULT_ANNOUNCEMENT_COLOR: &str = "#3498db";

const SETTINGS_FIELD: &str = "settings";
const LOGO_FIELD: &str = "logo";

pub const MSG_EMPTY_ANNOUNCEMENT: &str = "❌ Veuillez saisir une annonce";
pub const MSG_INVALID_LOGO: &str = "❌ Fichier de logo invalide";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminData {
    #[serde(default, deserialize_with = "lenient_settings", skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_announcements")]
    pub annonces: Vec<Announcement>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Persisted program settings. Commission and payout computations use fixed
/// constants and do not read these back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub commission_rate: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub payout_threshold: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub color: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
}

impl AdminData {
    /// Replace the settings, dropping any undecodable value kept from the
    /// stored record.
    pub fn set_settings(&mut self, settings: Settings) {
        self.extra.remove(SETTINGS_FIELD);
        self.settings = Some(settings);
    }

    pub fn set_logo(&mut self, logo: String) {
        self.extra.remove(LOGO_FIELD);
        self.logo = Some(logo);
    }

    /// Custom logo to display, if one was uploaded.
    pub fn custom_logo(&self) -> Option<&str> {
        self.logo
            .as_deref()
            .filter(|logo| !logo.is_empty() && *logo != DEFAULT_LOGO)
    }
}

fn lenient_settings<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Settings>, D::Error> {
    Ok(match Value::deserialize(d)? {
        v @ Value::Object(_) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

fn lenient_announcements<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Announcement>, D::Error> {
    let Value::Array(entries) = Value::deserialize(d)? else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            serde_json::from_value::<Announcement>(entry)
                .map_err(|e| log::warn!("Skipping malformed announcement: {e}"))
                .ok()
        })
        .collect())
}

/// Decode the stored admin record; anything but a JSON object yields defaults.
pub fn parse(raw: Option<&str>) -> AdminData {
    let Some(raw) = raw else {
        return AdminData::default();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => match serde_json::from_value::<AdminData>(Value::Object(fields.clone())) {
            Ok(mut data) => {
                keep_undecoded(&mut data.extra, &fields, SETTINGS_FIELD, data.settings.is_none());
                keep_undecoded(&mut data.extra, &fields, LOGO_FIELD, data.logo.is_none());
                data
            }
            Err(e) => {
                log::warn!("Stored '{ADMIN_DATA_KEY}' has an unexpected shape, ignoring: {e}");
                AdminData::default()
            }
        },
        Ok(Value::Null) => AdminData::default(),
        Ok(_) => {
            log::warn!("Stored '{ADMIN_DATA_KEY}' is not an object, ignoring");
            AdminData::default()
        }
        Err(e) => {
            log::warn!("Stored '{ADMIN_DATA_KEY}' is not valid JSON, ignoring: {e}");
            AdminData::default()
        }
    }
}

/// A known field whose stored value did not decode is carried in `extra`
/// verbatim, so writes to other fields leave it as it was.
fn keep_undecoded(extra: &mut Map<String, Value>, fields: &Map<String, Value>, key: &str, undecoded: bool) {
    if !undecoded {
        return;
    }
    if let Some(raw) = fields.get(key) {
        if !raw.is_null() {
            log::warn!("Stored '{ADMIN_DATA_KEY}.{key}' is not usable, keeping it unchanged");
        }
        extra.insert(key.to_string(), raw.clone());
    }
}

pub async fn load(store: &Store) -> Result<AdminData, AppError> {
    let raw = store.get_item(ADMIN_DATA_KEY).await?;
    Ok(parse(raw.as_deref()))
}

pub async fn save(store: &Store, data: &AdminData) -> Result<(), AppError> {
    let json = serde_json::to_string(data)?;
    store.set_item(ADMIN_DATA_KEY, &json).await
}

/// Identifier for a new announcement: the creation instant in milliseconds,
/// bumped past the current maximum if another entry already holds it.
fn next_announcement_id(existing: &[Announcement], now_millis: i64) -> i64 {
    if existing.iter().any(|a| a.id == now_millis) {
        existing.iter().map(|a| a.id).max().unwrap_or(now_millis) + 1
    } else {
        now_millis
    }
}

/// Append an announcement. Blank text is rejected with a validation error and
/// nothing is written.
pub async fn publish_announcement(
    store: &Store,
    text: &str,
    color: &str,
    now: DateTime<Local>,
) -> Result<Announcement, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(MSG_EMPTY_ANNOUNCEMENT.to_string()));
    }

    let mut data = load(store).await?;
    let color = match color.trim() {
        "" => DEFAULT_ANNOUNCEMENT_COLOR.to_string(),
        c => c.to_string(),
    };
    let announcement = Announcement {
        id: next_announcement_id(&data.annonces, now.timestamp_millis()),
        text: text.to_string(),
        color,
        date: now.format("%d/%m/%Y").to_string(),
    };
    data.annonces.push(announcement.clone());
    save(store, &data).await?;
    Ok(announcement)
}

/// Remove the announcement with `id`. Returns whether one was removed.
pub async fn delete_announcement(store: &Store, id: i64) -> Result<bool, AppError> {
    let mut data = load(store).await?;
    let before = data.annonces.len();
    data.annonces.retain(|a| a.id != id);
    if data.annonces.len() == before {
        return Ok(false);
    }
    save(store, &data).await?;
    Ok(true)
}

/// Check that `uri` is a base64 `data:image/...` URI whose decoded payload
/// fits in `max_bytes`.
pub fn validate_logo_data_uri(uri: &str, max_bytes: usize) -> Result<(), String> {
    let rest = uri.strip_prefix("data:").ok_or("not a data URI")?;
    let (meta, payload) = rest.split_once(',').ok_or("missing payload")?;
    let mime = meta.strip_suffix(";base64").ok_or("payload is not base64")?;
    if !mime.starts_with("image/") {
        return Err(format!("unsupported media type '{mime}'"));
    }
    let bytes = STANDARD.decode(payload).map_err(|e| e.to_string())?;
    if bytes.is_empty() {
        return Err("empty image".to_string());
    }
    if bytes.len() > max_bytes {
        return Err(format!("image is {} bytes, limit is {max_bytes}", bytes.len()));
    }
    Ok(())
}

/// Store an uploaded logo given as a data URI.
pub async fn set_logo(store: &Store, data_uri: &str, max_bytes: usize) -> Result<(), AppError> {
    if let Err(reason) = validate_logo_data_uri(data_uri, max_bytes) {
        log::warn!("Rejected logo upload: {reason}");
        return Err(AppError::Validation(MSG_INVALID_LOGO.to_string()));
    }
    let mut data = load(store).await?;
    data.set_logo(data_uri.to_string());
    save(store, &data).await
}

/// Persist the raw settings inputs as integers (`None` when not numeric).
pub async fn save_settings(
    store: &Store,
    commission_rate: &str,
    payout_threshold: &str,
) -> Result<Settings, AppError> {
    let settings = Settings {
        commission_rate: lenient::parse_int_prefix(commission_rate),
        payout_threshold: lenient::parse_int_prefix(payout_threshold),
    };
    let mut data = load(store).await?;
    data.set_settings(settings.clone());
    save(store, &data).await?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_1PX: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

    #[test]
    fn data_uri_accepts_small_image() {
        let uri = format!("data:image/png;base64,{PNG_1PX}");
        assert!(validate_logo_data_uri(&uri, 1024).is_ok());
    }

    #[test]
    fn data_uri_rejects_bad_shapes() {
        assert!(validate_logo_data_uri("images/logo.png", 1024).is_err());
        assert!(validate_logo_data_uri("data:text/plain;base64,aGVsbG8=", 1024).is_err());
        assert!(validate_logo_data_uri("data:image/png,rawbytes", 1024).is_err());
        assert!(validate_logo_data_uri("data:image/png;base64,@@@", 1024).is_err());
        assert!(validate_logo_data_uri("data:image/png;base64,", 1024).is_err());
    }

    #[test]
    fn data_uri_enforces_size_limit() {
        let uri = format!("data:image/png;base64,{PNG_1PX}");
        assert!(validate_logo_data_uri(&uri, 10).is_err());
    }

    #[test]
    fn colliding_ids_are_bumped() {
        let existing = vec![
            Announcement { id: 100, text: "a".into(), color: "red".into(), date: String::new() },
            Announcement { id: 250, text: "b".into(), color: "red".into(), date: String::new() },
        ];
        assert_eq!(next_announcement_id(&existing, 300), 300);
        assert_eq!(next_announcement_id(&existing, 100), 251);
    }

    #[test]
    fn parse_keeps_unknown_keys_and_skips_bad_announcements() {
        let raw = r#"{"theme":"dark","annonces":[{"id":1,"text":"ok","color":"red","date":"01/01/2026"},"junk"],"settings":{"commissionRate":"15","payoutThreshold":null}}"#;
        let data = parse(Some(raw));
        assert_eq!(data.annonces.len(), 1);
        assert_eq!(data.extra.get("theme"), Some(&Value::String("dark".into())));
        let settings = data.settings.unwrap();
        assert_eq!(settings.commission_rate, Some(15));
        assert_eq!(settings.payout_threshold, None);
    }

    #[test]
    fn custom_logo_ignores_default_path() {
        let mut data = AdminData { logo: Some(DEFAULT_LOGO.into()), ..Default::default() };
        assert!(data.custom_logo().is_none());
        data.logo = Some("data:image/png;base64,AAAA".into());
        assert_eq!(data.custom_logo(), Some("data:image/png;base64,AAAA"));
    }
}
