//! Shared test infrastructure.
//!
//! - `setup_store()` / `setup_store_with()` - in-memory stores, optionally seeded
//! - `sample_affiliates_json()` - three affiliates as the registration flow writes them
//! - `Browser` - carries the session cookie between `actix_web::test` requests

#![allow(dead_code)]

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::test::TestRequest;
use regex::Regex;
use serde::Serialize;

use replayfx_admin::models::affiliate::AFFILIATES_KEY;
use replayfx_admin::store::{MemoryStore, Store};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "admin123";
/// Cookie name used by actix-session by default.
pub const SESSION_COOKIE: &str = "id";

// ============================================================================
// STORE SETUP
// ============================================================================

pub fn setup_store() -> Store {
    MemoryStore::new().into()
}

pub fn setup_store_with(affiliates_json: &str) -> Store {
    MemoryStore::with_items([(AFFILIATES_KEY, affiliates_json)]).into()
}

/// Alice (payable, 150€), Bob (active, 18€, no id), Chloé (payable, 60€,
/// sales stored as a string, no payment method).
pub fn sample_affiliates_json() -> String {
    serde_json::json!([
        {
            "id": "HRX-001",
            "fullName": "Alice Martin",
            "email": "alice@example.com",
            "sales": 1000,
            "paymentMethod": "PayPal",
            "paymentDetails": "alice@paypal.example",
            "registrationDate": "2026-01-10T12:00:00.000Z",
            "phone": "+33 6 12 34 56 78"
        },
        {
            "fullName": "Bob Durand",
            "email": "bob@example.com",
            "sales": 120,
            "paymentMethod": "Virement",
            "paymentDetails": "FR76 3000 6000 0112 3456 7890 189",
            "registrationDate": "2026-02-01T12:00:00.000Z"
        },
        {
            "id": "HRX-003",
            "fullName": "Chloé Petit",
            "email": "chloe@example.com",
            "sales": "400",
            "paymentDetails": "chloe@paypal.example",
            "registrationDate": "2026-03-05T12:00:00.000Z"
        }
    ])
    .to_string()
}

// ============================================================================
// HTTP HELPERS
// ============================================================================

/// Minimal cookie jar: remembers the latest session cookie.
#[derive(Default)]
pub struct Browser {
    session: Option<Cookie<'static>>,
}

impl Browser {
    pub fn get(&self, uri: &str) -> TestRequest {
        self.with_cookie(TestRequest::get().uri(uri))
    }

    pub fn post_form(&self, uri: &str, form: impl Serialize) -> TestRequest {
        self.with_cookie(TestRequest::post().uri(uri).set_form(form))
    }

    fn with_cookie(&self, req: TestRequest) -> TestRequest {
        match &self.session {
            Some(cookie) => req.cookie(cookie.clone()),
            None => req,
        }
    }

    pub fn remember<B>(&mut self, resp: &ServiceResponse<B>) {
        if let Some(cookie) = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
        {
            self.session = Some(cookie.into_owned());
        }
    }
}

pub fn body_text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).expect("response body is not UTF-8")
}

/// Pull the CSRF token out of a rendered form.
pub fn csrf_token(html: &str) -> String {
    let re = Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).expect("valid regex");
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .expect("page has no CSRF token")
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Markup of one dashboard `<section>` (from its opening tag to its close).
pub fn section_html<'a>(html: &'a str, id: &str) -> &'a str {
    let open = format!(r#"<section id="{id}""#);
    let start = html.find(&open).unwrap_or_else(|| panic!("no section '{id}'"));
    let end = html[start..]
        .find("</section>")
        .map(|i| start + i)
        .unwrap_or(html.len());
    &html[start..end]
}
