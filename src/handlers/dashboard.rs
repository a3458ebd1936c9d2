use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::errors::{AppError, render};
use crate::models::dashboard::{self as view, Summary};
use crate::models::{admin_data, affiliate};
use crate::store::Store;
use crate::templates_structs::{AffiliatesView, DashboardTemplate, NavItem, PageContext, SettingsView};

/// Dashboard sections reachable from the side menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Overview,
    Affiliates,
    Payments,
    Settings,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Overview,
        Section::Affiliates,
        Section::Payments,
        Section::Settings,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::Affiliates => "affiliates",
            Section::Payments => "payments",
            Section::Settings => "settings",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Section::Overview => "Tableau de bord",
            Section::Affiliates => "Affiliés",
            Section::Payments => "Paiements",
            Section::Settings => "Paramètres",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Section::Overview => "📊",
            Section::Affiliates => "👥",
            Section::Payments => "💰",
            Section::Settings => "⚙️",
        }
    }
}

#[derive(Deserialize)]
pub struct SectionQuery {
    pub q: Option<String>,
}

/// GET /dashboard
pub async fn index(
    store: web::Data<Store>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    render_dashboard(&store, &session, Section::Overview.id(), None).await
}

/// GET /dashboard/{section}
pub async fn section(
    store: web::Data<Store>,
    session: Session,
    path: web::Path<String>,
    query: web::Query<SectionQuery>,
) -> Result<HttpResponse, AppError> {
    let section_id = path.into_inner();
    render_dashboard(&store, &session, &section_id, query.q.as_deref()).await
}

/// Render the dashboard with `section_id` active. The summary is computed on
/// every render; only the active section's loader runs. An unknown id leaves
/// every section inactive.
async fn render_dashboard(
    store: &Store,
    session: &Session,
    section_id: &str,
    search: Option<&str>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session);
    let affiliates = affiliate::load_all(store).await?;
    let summary = Summary::compute(&affiliates);
    let active = Section::from_id(section_id);

    let nav = Section::ALL
        .iter()
        .map(|s| NavItem {
            id: s.id(),
            label: s.label(),
            icon: s.icon(),
            active: active == Some(*s),
        })
        .collect();

    let mut tmpl = DashboardTemplate {
        ctx,
        nav,
        active_section: section_id.to_string(),
        summary,
        affiliates: None,
        payments: None,
        settings: None,
    };

    match active {
        Some(Section::Affiliates) => {
            let term = search.unwrap_or("");
            let mut rows = view::affiliate_rows(&affiliates);
            view::apply_search(&mut rows, term);
            tmpl.affiliates = Some(AffiliatesView { rows, search: term.to_string() });
        }
        Some(Section::Payments) => {
            tmpl.payments = Some(view::payable_items(&affiliates));
        }
        Some(Section::Settings) => {
            let data = admin_data::load(store).await?;
            tmpl.settings = Some(SettingsView::from_admin_data(&data));
        }
        Some(Section::Overview) => {}
        None => log::debug!("Unknown dashboard section '{section_id}'"),
    }

    render(tmpl)
}
