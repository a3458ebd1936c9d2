//! Affiliate record tests: tolerant loading, payment processing, deletion.
//!
//! All tests run against the in-memory store; positions refer to the sample
//! list from `common::sample_affiliates_json()`.

mod common;

use chrono::{TimeZone, Utc};
use replayfx_admin::models::affiliate::{self, AFFILIATES_KEY};
use replayfx_admin::models::dashboard::{Summary, is_payable, payable_items};
use replayfx_admin::store::{MemoryStore, Store};
use common::*;

#[tokio::test]
async fn test_load_missing_key_is_empty() {
    let store = setup_store();
    let list = affiliate::load_all(&store).await.expect("load");
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_load_sample_with_defaults() {
    let store = setup_store_with(&sample_affiliates_json());
    let list = affiliate::load_all(&store).await.expect("load");

    assert_eq!(list.len(), 3);
    assert_eq!(list[0].id.as_deref(), Some("HRX-001"));
    assert_eq!(list[0].sales, 1000.0);
    assert!(list[1].id.is_none());
    // Sales stored as text are read as a number
    assert_eq!(list[2].sales, 400.0);
    assert!(list[2].payment_method.is_none());
}

#[tokio::test]
async fn test_load_skips_malformed_entries() {
    let raw = r#"[{"fullName":"Ok","email":"ok@example.com"},"oops",42,null,{"fullName":"Also ok","sales":null}]"#;
    let store = setup_store_with(raw);
    let list = affiliate::load_all(&store).await.expect("load");

    assert_eq!(list.len(), 2);
    assert_eq!(list[0].full_name, "Ok");
    assert_eq!(list[0].sales, 0.0);
    assert_eq!(list[1].full_name, "Also ok");
}

#[tokio::test]
async fn test_load_rejects_wrong_outer_shape() {
    for raw in [r#"{"fullName":"not a list"}"#, "not json at all", "null", "\"[]\""] {
        let store = setup_store_with(raw);
        let list = affiliate::load_all(&store).await.expect("load");
        assert!(list.is_empty(), "expected empty list for {raw}");
    }
}

#[tokio::test]
async fn test_process_payment_resets_sales() {
    let store = setup_store_with(&sample_affiliates_json());
    let paid_at = Utc.with_ymd_and_hms(2026, 4, 1, 9, 30, 0).unwrap();

    let paid = affiliate::process_payment(&store, 0, paid_at)
        .await
        .expect("process payment")
        .expect("affiliate exists");
    assert_eq!(paid.full_name, "Alice Martin");
    assert_eq!(paid.sales, 0.0);

    let list = affiliate::load_all(&store).await.expect("reload");
    assert_eq!(list[0].sales, 0.0);
    assert_eq!(list[0].last_payment.as_deref(), Some("2026-04-01T09:30:00.000Z"));
    assert!(!is_payable(&list[0]));

    // Alice leaves the payable set; Chloé remains
    let payments = payable_items(&list);
    assert_eq!(payments.items.len(), 1);
    assert_eq!(payments.items[0].full_name, "Chloé Petit");
    assert_eq!(Summary::compute(&list).pending_payments, 1);
}

#[tokio::test]
async fn test_process_payment_out_of_range_is_noop() {
    let raw = sample_affiliates_json();
    let memory = MemoryStore::with_items([(AFFILIATES_KEY, raw.as_str())]);
    let store: Store = memory.clone().into();

    let result = affiliate::process_payment(&store, 3, Utc::now()).await.expect("process");
    assert!(result.is_none());
    // Nothing rewritten
    assert_eq!(memory.get_item(AFFILIATES_KEY).as_deref(), Some(raw.as_str()));
}

#[tokio::test]
async fn test_write_preserves_unknown_fields() {
    let memory = MemoryStore::with_items([(AFFILIATES_KEY, sample_affiliates_json())]);
    let store: Store = memory.clone().into();

    affiliate::process_payment(&store, 1, Utc::now()).await.expect("process");

    let raw = memory.get_item(AFFILIATES_KEY).expect("written");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    assert_eq!(value[0]["phone"], "+33 6 12 34 56 78");
    assert_eq!(value[0]["fullName"], "Alice Martin");
    assert!(value[1]["lastPayment"].is_string());
    // Absent id stays absent
    assert!(value[1].get("id").is_none());
}

#[tokio::test]
async fn test_delete_removes_exactly_one_and_shifts() {
    let store = setup_store_with(&sample_affiliates_json());

    let removed = affiliate::delete(&store, 1)
        .await
        .expect("delete")
        .expect("affiliate exists");
    assert_eq!(removed.full_name, "Bob Durand");

    let list = affiliate::load_all(&store).await.expect("reload");
    let names: Vec<&str> = list.iter().map(|a| a.full_name.as_str()).collect();
    assert_eq!(names, vec!["Alice Martin", "Chloé Petit"]);

    // Chloé now sits at position 1
    let removed = affiliate::delete(&store, 1).await.expect("delete").expect("exists");
    assert_eq!(removed.full_name, "Chloé Petit");
    assert_eq!(affiliate::load_all(&store).await.expect("reload").len(), 1);
}

#[tokio::test]
async fn test_delete_out_of_range_is_noop() {
    let store = setup_store_with(&sample_affiliates_json());
    assert!(affiliate::delete(&store, 10).await.expect("delete").is_none());
    assert_eq!(affiliate::load_all(&store).await.expect("reload").len(), 3);
}

#[tokio::test]
async fn test_summary_over_sample() {
    let store = setup_store_with(&sample_affiliates_json());
    let list = affiliate::load_all(&store).await.expect("load");
    let summary = Summary::compute(&list);

    let expected: f64 = list.iter().map(|a| a.sales * 0.15).sum();
    assert!((summary.total_commissions - expected).abs() < 1e-9);
    assert_eq!(summary.total_affiliates, 3);
    assert_eq!(summary.pending_payments, 2);
    assert_eq!(summary.total_commissions_display(), "228.00€");
    assert_eq!(summary.monthly_revenue_display(), "68.40€");
}
