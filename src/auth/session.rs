use actix_session::Session;

use crate::errors::AppError;

/// Presence flag set at login; the dashboard gate checks nothing else.
pub const LOGGED_IN_KEY: &str = "adminLoggedIn";
pub const USERNAME_KEY: &str = "adminUsername";
pub const DEFAULT_ADMIN_NAME: &str = "admin";
const FLASH_KEY: &str = "flash";

pub fn is_logged_in(session: &Session) -> bool {
    session.get::<bool>(LOGGED_IN_KEY).unwrap_or(None).unwrap_or(false)
}

/// Name shown in the header, `admin` when none was stored.
pub fn admin_name(session: &Session) -> String {
    session
        .get::<String>(USERNAME_KEY)
        .unwrap_or(None)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string())
}

pub fn sign_in(session: &Session, username: &str) -> Result<(), AppError> {
    session.renew();
    session
        .insert(LOGGED_IN_KEY, true)
        .and_then(|_| session.insert(USERNAME_KEY, username))
        .map_err(|e| AppError::Session(e.to_string()))
}

pub fn sign_out(session: &Session) {
    session.remove(LOGGED_IN_KEY);
    session.remove(USERNAME_KEY);
}

pub fn set_flash(session: &Session, message: &str) {
    let _ = session.insert(FLASH_KEY, message);
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH_KEY).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}
