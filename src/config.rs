//! Runtime configuration read from the environment (and `.env` via dotenvy).

use std::env;

use crate::auth::password;
use crate::errors::AppError;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// PostgreSQL URL; without it records live in process memory.
    pub database_url: Option<String>,
    pub session_key: Option<String>,
    pub admin_username: String,
    pub admin_password_hash: String,
    pub max_logo_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let admin_password = match env::var("ADMIN_PASSWORD") {
            Ok(p) if !p.is_empty() => p,
            _ => {
                log::warn!("No ADMIN_PASSWORD set: using the default password");
                DEFAULT_ADMIN_PASSWORD.to_string()
            }
        };

        let max_logo_bytes = match env::var("MAX_LOGO_BYTES") {
            Ok(v) => v
                .parse()
                .map_err(|_| AppError::Config(format!("MAX_LOGO_BYTES is not a number: {v}")))?,
            Err(_) => DEFAULT_MAX_LOGO_BYTES,
        };

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            session_key: env::var("SESSION_KEY").ok(),
            admin_username: env::var("ADMIN_USERNAME")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| crate::auth::session::DEFAULT_ADMIN_NAME.to_string()),
            admin_password_hash: password::hash_password(&admin_password)?,
            max_logo_bytes,
        })
    }

    /// Configuration for a given admin login, everything else at defaults.
    pub fn with_admin(username: &str, password: &str) -> Result<Self, AppError> {
        Ok(Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: None,
            session_key: None,
            admin_username: username.to_string(),
            admin_password_hash: password::hash_password(password)?,
            max_logo_bytes: DEFAULT_MAX_LOGO_BYTES,
        })
    }

    /// Upper bound for urlencoded form bodies. A logo arrives base64 encoded
    /// and then percent-encoded, so allow twice its raw size.
    pub fn form_limit(&self) -> usize {
        self.max_logo_bytes * 2 + 16 * 1024
    }

    pub fn check_credentials(&self, username: &str, password: &str) -> Result<bool, AppError> {
        if username.trim() != self.admin_username {
            return Ok(false);
        }
        password::verify_password(password, &self.admin_password_hash)
    }
}
