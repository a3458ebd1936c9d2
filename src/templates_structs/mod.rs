// Template context structures for Askama templates.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{admin_name, take_flash};

mod common;
mod dashboard;

pub use self::common::LoginTemplate;
pub use self::dashboard::{AffiliatesView, DashboardTemplate, NavItem, SettingsView};

pub const APP_NAME: &str = "HelloReplayFX";

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.admin_name`, `ctx.flash`, etc.
pub struct PageContext {
    pub admin_name: String,
    pub avatar_initial: String,
    pub flash: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
}

impl PageContext {
    pub fn build(session: &Session) -> Self {
        let admin_name = admin_name(session);
        let avatar_initial = admin_name.chars().next().unwrap_or('?').to_uppercase().to_string();
        Self {
            flash: take_flash(session),
            csrf_token: csrf::get_or_create_token(session),
            app_name: APP_NAME.to_string(),
            admin_name,
            avatar_initial,
        }
    }
}
