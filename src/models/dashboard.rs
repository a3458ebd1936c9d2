//! Derived views over the affiliate list: commission, summary figures, table
//! rows, the payable list, search filtering, and CSV export.
//!
//! Everything here is pure. Handlers load the records, call into this module,
//! and hand the result to a template.

use chrono::{DateTime, Local};

use crate::models::affiliate::Affiliate;

/// Share of sales paid out as commission.
pub const COMMISSION_RATE: f64 = 0.15;
/// Commission at or above which an affiliate is due a payout.
pub const PAYABLE_THRESHOLD: f64 = 50.0;
/// Share of total commission reported as monthly revenue.
pub const REVENUE_SHARE: f64 = 0.3;
/// Number of affiliates shown in the "recent" list.
pub const RECENT_LIMIT: usize = 5;

pub const DEFAULT_PAYMENT_METHOD: &str = "PayPal";
pub const CSV_HEADER: &str = "ID,Nom,Email,Ventes,Commission,Méthode de paiement";
pub const EXPORT_FILENAME: &str = "affilies_helloreplayfx.csv";

pub fn commission(sales: f64) -> f64 {
    sales * COMMISSION_RATE
}

pub fn is_payable(affiliate: &Affiliate) -> bool {
    commission(affiliate.sales) >= PAYABLE_THRESHOLD
}

/// Monetary amount as shown in the dashboard: two decimals and a euro sign.
pub fn format_euros(amount: f64) -> String {
    format!("{amount:.2}€")
}

/// Plain number text: integral values without a fractional part, others in
/// their shortest round-trip form (`100`, `22.5`). Magnitudes from 1e21 up
/// and below 1e-6 use exponent notation with a signed exponent (`1e+21`,
/// `1.5e-7`), as browsers print them.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let text = format!("{value:e}");
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        };
    }
    value.to_string()
}

/// Registration timestamp as a day/month/year date in local time. Values that
/// are not RFC 3339 are shown as stored.
pub fn format_date(raw: Option<&str>) -> String {
    match raw {
        None => "-".to_string(),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| d.with_timezone(&Local).format("%d/%m/%Y").to_string())
            .unwrap_or_else(|_| s.to_string()),
    }
}

/// Identifier shown in the table: the stored id, else `AFF<position>`.
pub fn display_id(affiliate: &Affiliate, index: usize) -> String {
    affiliate
        .id
        .clone()
        .unwrap_or_else(|| format!("AFF{}", index + 1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffiliateStatus {
    Payable,
    Active,
}

impl AffiliateStatus {
    pub fn of(affiliate: &Affiliate) -> Self {
        if is_payable(affiliate) {
            AffiliateStatus::Payable
        } else {
            AffiliateStatus::Active
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AffiliateStatus::Payable => "À payer",
            AffiliateStatus::Active => "Actif",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            AffiliateStatus::Payable => "pending",
            AffiliateStatus::Active => "active",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentAffiliate {
    pub full_name: String,
    pub email: String,
    pub registered_on: String,
}

/// Headline figures for the overview section.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_affiliates: usize,
    pub total_commissions: f64,
    pub pending_payments: usize,
    pub monthly_revenue: f64,
    /// Most recently added affiliates, in list order.
    pub recent: Vec<RecentAffiliate>,
}

impl Summary {
    pub fn compute(affiliates: &[Affiliate]) -> Self {
        let total_commissions: f64 = affiliates.iter().map(|a| commission(a.sales)).sum();
        let pending_payments = affiliates.iter().filter(|a| is_payable(a)).count();
        let recent = affiliates[affiliates.len().saturating_sub(RECENT_LIMIT)..]
            .iter()
            .map(|a| RecentAffiliate {
                full_name: a.full_name.clone(),
                email: a.email.clone(),
                registered_on: format_date(a.registration_date.as_deref()),
            })
            .collect();

        Self {
            total_affiliates: affiliates.len(),
            total_commissions,
            pending_payments,
            monthly_revenue: total_commissions * REVENUE_SHARE,
            recent,
        }
    }

    pub fn total_commissions_display(&self) -> String {
        format_euros(self.total_commissions)
    }

    pub fn monthly_revenue_display(&self) -> String {
        format_euros(self.monthly_revenue)
    }
}

/// One line of the affiliate table.
#[derive(Debug, Clone, PartialEq)]
pub struct AffiliateRow {
    /// Position in the stored list; row actions address affiliates by it.
    pub index: usize,
    pub display_id: String,
    pub full_name: String,
    pub email: String,
    pub sales: String,
    pub commission: String,
    pub status: AffiliateStatus,
    pub hidden: bool,
}

impl AffiliateRow {
    /// Text of the data cells (actions excluded), joined by one space and
    /// lowercased. `static/js/admin.js` builds the same string for the live
    /// filter.
    pub fn search_text(&self) -> String {
        [
            self.display_id.as_str(),
            self.full_name.as_str(),
            self.email.as_str(),
            self.sales.as_str(),
            self.commission.as_str(),
            self.status.label(),
        ]
        .join(" ")
        .to_lowercase()
    }
}

pub fn affiliate_rows(affiliates: &[Affiliate]) -> Vec<AffiliateRow> {
    affiliates
        .iter()
        .enumerate()
        .map(|(index, a)| AffiliateRow {
            index,
            display_id: display_id(a, index),
            full_name: a.full_name.clone(),
            email: a.email.clone(),
            sales: format_number(a.sales),
            commission: format_euros(commission(a.sales)),
            status: AffiliateStatus::of(a),
            hidden: false,
        })
        .collect()
}

/// Hide every row whose text does not contain `term` (case-insensitive).
/// An empty term shows every row.
pub fn apply_search(rows: &mut [AffiliateRow], term: &str) {
    let needle = term.to_lowercase();
    for row in rows {
        row.hidden = !row.search_text().contains(&needle);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentItem {
    pub index: usize,
    pub full_name: String,
    pub email: String,
    pub payment_method: String,
    pub payment_details: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentsView {
    pub items: Vec<PaymentItem>,
    pub total_amount: f64,
}

impl PaymentsView {
    pub fn total_amount_display(&self) -> String {
        format_euros(self.total_amount)
    }
}

/// Affiliates due a payout, keeping their list positions.
pub fn payable_items(affiliates: &[Affiliate]) -> PaymentsView {
    let items: Vec<PaymentItem> = affiliates
        .iter()
        .enumerate()
        .filter(|(_, a)| is_payable(a))
        .map(|(index, a)| PaymentItem {
            index,
            full_name: a.full_name.clone(),
            email: a.email.clone(),
            payment_method: a
                .payment_method
                .clone()
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            payment_details: a.payment_details.clone(),
            amount: format_euros(commission(a.sales)),
        })
        .collect();
    let total_amount = affiliates
        .iter()
        .filter(|a| is_payable(a))
        .map(|a| commission(a.sales))
        .sum();
    PaymentsView { items, total_amount }
}

/// CSV export of the whole list, or `None` when there is nothing to export.
/// Fields are written as-is, without quoting.
pub fn export_csv(affiliates: &[Affiliate]) -> Option<String> {
    if affiliates.is_empty() {
        return None;
    }
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for a in affiliates {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            a.id.as_deref().unwrap_or("N/A"),
            a.full_name,
            a.email,
            format_number(a.sales),
            format_number(commission(a.sales)),
            a.payment_method.as_deref().unwrap_or("N/A"),
        ));
    }
    Some(csv)
}
