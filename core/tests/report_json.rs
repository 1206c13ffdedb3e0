//! The JSON body shape served to clients.

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use txscreen_core::{rule_evaluator::evaluate_at, TransactionInput};

#[test]
fn report_serializes_camel_case() {
    let _ = env_logger::builder().is_test(true).try_init();

    let ts = Utc.with_ymd_and_hms(2024, 6, 8, 2, 30, 0).unwrap();
    let analyzed = Utc.with_ymd_and_hms(2024, 6, 8, 2, 30, 1).unwrap();
    let input = TransactionInput::new("Zanele", 9_999.0, ts);

    let body: Value = serde_json::from_str(&evaluate_at(&input, analyzed).to_json().unwrap()).unwrap();

    assert_eq!(
        body["transactionDetails"],
        json!({
            "name": "Zanele",
            "amount": 9999,
            "timestamp": "2024-06-08T02:30:00.000Z",
            "timestampSource": "provided",
            "hourUtc": 2,
            "dayOfWeek": 6,
        })
    );

    // 35 + 20 + 10
    assert_eq!(body["analysis"]["suspicious"], json!(true));
    assert_eq!(body["analysis"]["riskScore"], json!(65));
    assert_eq!(body["analysis"]["riskLevel"], json!("HIGH"));
    assert_eq!(body["analysis"]["alertsTriggered"], json!(3));
    assert!(body["analysis"]["summary"].is_string());

    let alerts = body["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 3);
    assert_eq!(alerts[0]["rule"], json!("POSSIBLE_STRUCTURING"));
    assert_eq!(alerts[0]["severity"], json!("HIGH"));
    assert_eq!(alerts[2]["rule"], json!("WEEKEND_TRANSACTION"));
    assert_eq!(alerts[2]["severity"], json!("LOW"));
    assert!(alerts[0]["message"].as_str().unwrap().contains("R9999"));

    assert!(body["recommendation"].is_string());
    assert_eq!(body["analyzedAt"], json!("2024-06-08T02:30:01.000Z"));
}

#[test]
fn fractional_and_infinite_amounts() {
    let ts = Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).unwrap();

    let small = evaluate_at(&TransactionInput::new("A", 2.75, ts), ts);
    let body: Value = serde_json::from_str(&small.to_json().unwrap()).unwrap();
    assert_eq!(body["transactionDetails"]["amount"], json!(2.75));

    let huge = evaluate_at(&TransactionInput::new("B", f64::INFINITY, ts), ts);
    let body: Value = serde_json::from_str(&huge.to_json().unwrap()).unwrap();
    assert_eq!(body["transactionDetails"]["amount"], Value::Null);
    assert_eq!(body["analysis"]["riskScore"], json!(90));
    assert!(huge.alerts[0].message.contains("RInfinity"));
}
