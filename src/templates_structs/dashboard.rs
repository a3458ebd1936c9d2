use askama::Template;

use crate::models::admin_data::{AdminData, Announcement};
use crate::models::dashboard::{AffiliateRow, PaymentsView, Summary};

use super::PageContext;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub nav: Vec<NavItem>,
    /// Requested section id; may name no known section.
    pub active_section: String,
    pub summary: Summary,
    // Filled only for the active section
    pub affiliates: Option<AffiliatesView>,
    pub payments: Option<PaymentsView>,
    pub settings: Option<SettingsView>,
}

impl DashboardTemplate {
    pub fn is_active(&self, id: &str) -> bool {
        self.active_section == id
    }
}

pub struct NavItem {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

pub struct AffiliatesView {
    pub rows: Vec<AffiliateRow>,
    pub search: String,
}

impl AffiliatesView {
    pub fn visible_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.hidden).count()
    }
}

pub struct SettingsView {
    pub logo_src: Option<String>,
    pub announcements: Vec<Announcement>,
    pub commission_rate: String,
    pub payout_threshold: String,
}

impl SettingsView {
    pub fn from_admin_data(data: &AdminData) -> Self {
        let (commission_rate, payout_threshold) = match &data.settings {
            Some(s) => (
                s.commission_rate.map(|v| v.to_string()).unwrap_or_default(),
                s.payout_threshold.map(|v| v.to_string()).unwrap_or_default(),
            ),
            None => ("15".to_string(), "50".to_string()),
        };
        Self {
            logo_src: data.custom_logo().map(str::to_string),
            announcements: data.annonces.clone(),
            commission_rate,
            payout_threshold,
        }
    }
}
