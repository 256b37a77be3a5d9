//! Tests for checksum embedding and verification.

mod common;

use autosoft_license::{
    build_with_checksum, canonicalize, checksum_of, verify, LicenseType, CHECKSUM_FIELD,
};
use common::sample_record;
use pretty_assertions::assert_eq;
use serde_json::Value;

#[test]
fn built_text_verifies_and_restores_record() {
    let record = sample_record(LicenseType::Subscription);
    let text = build_with_checksum(&record).unwrap();

    let report = verify(&text);
    assert!(report.valid);

    let restored = report.record.unwrap();
    assert_eq!(restored.without_checksum(), record);
    assert_eq!(restored.checksum_sha256, Some(checksum_of(&record).unwrap()));
}

#[test]
fn build_is_idempotent() {
    let record = sample_record(LicenseType::Demo);
    assert_eq!(
        build_with_checksum(&record).unwrap(),
        build_with_checksum(&record).unwrap()
    );
}

#[test]
fn existing_checksum_is_ignored() {
    let record = sample_record(LicenseType::Demo);
    let mut stale = record.clone();
    stale.checksum_sha256 = Some("0".repeat(64));

    assert_eq!(
        build_with_checksum(&stale).unwrap(),
        build_with_checksum(&record).unwrap()
    );
}

#[test]
fn checksum_member_is_in_sorted_position() {
    let text = build_with_checksum(&sample_record(LicenseType::Demo)).unwrap();
    let checksum_at = text.find(CHECKSUM_FIELD).unwrap();
    let company_at = text.find("CompanyName").unwrap();
    let currency_at = text.find("CurrencyCode").unwrap();

    assert!(checksum_at < company_at);
    assert!(company_at < currency_at);
}

#[test]
fn checksum_covers_text_without_checksum() {
    let record = sample_record(LicenseType::Permanent);
    let text = build_with_checksum(&record).unwrap();
    let tree: Value = serde_json::from_str(&text).unwrap();

    let embedded = tree[CHECKSUM_FIELD].as_str().unwrap();
    assert_eq!(
        embedded,
        autosoft_crypto::sha256_hex(canonicalize(&record).as_bytes())
    );
}

#[test]
fn uppercase_checksum_is_accepted() {
    let text = build_with_checksum(&sample_record(LicenseType::Demo)).unwrap();
    let mut tree: Value = serde_json::from_str(&text).unwrap();
    let upper = tree[CHECKSUM_FIELD].as_str().unwrap().to_ascii_uppercase();
    tree[CHECKSUM_FIELD] = Value::String(upper);

    assert!(verify(&tree.to_string()).valid);
}

#[test]
fn reordered_members_still_verify() {
    let text = build_with_checksum(&sample_record(LicenseType::Demo)).unwrap();
    let tree: Value = serde_json::from_str(&text).unwrap();

    let mut members: Vec<(String, Value)> = tree.as_object().unwrap().clone().into_iter().collect();
    members.reverse();
    let body: Vec<String> = members
        .iter()
        .map(|(k, v)| format!("{}:{}", serde_json::to_string(k).unwrap(), v))
        .collect();
    let reordered = format!("{{ {} }}", body.join(", "));

    assert!(verify(&reordered).valid);
}

#[test]
fn modified_field_is_detected() {
    let text = build_with_checksum(&sample_record(LicenseType::Demo)).unwrap();
    let modified = text.replace("RoundTripCo", "RoundTripCp");

    let report = verify(&modified);
    assert!(!report.valid);
}

#[test]
fn extended_validity_is_detected() {
    let text = build_with_checksum(&sample_record(LicenseType::Demo)).unwrap();
    let modified = text.replace("2025-07-01T00:00:00Z", "2099-07-01T00:00:00Z");

    assert!(!verify(&modified).valid);
}

#[test]
fn missing_checksum_is_invalid() {
    let text = canonicalize(&sample_record(LicenseType::Demo));
    let report = verify(&text);
    assert!(!report.valid);
    assert!(report.record.is_none());
}

#[test]
fn non_string_checksum_is_invalid() {
    let text = build_with_checksum(&sample_record(LicenseType::Demo)).unwrap();
    let mut tree: Value = serde_json::from_str(&text).unwrap();
    tree[CHECKSUM_FIELD] = Value::from(42);

    assert!(!verify(&tree.to_string()).valid);
}

#[test]
fn malformed_input_is_invalid() {
    for text in ["", "not json", "[1,2,3]", "\"string\"", "{\"ChecksumSHA256\":"] {
        let report = verify(text);
        assert!(!report.valid, "{text:?} should not verify");
        assert!(report.record.is_none());
    }
}

#[test]
fn valid_checksum_over_foreign_shape_has_no_record() {
    let body = serde_json::json!({"Hello": "World"});
    let digest = autosoft_crypto::sha256_hex(canonicalize(&body).as_bytes());
    let text = serde_json::json!({"Hello": "World", "ChecksumSHA256": digest}).to_string();

    let report = verify(&text);
    assert!(report.valid);
    assert!(report.record.is_none());
}
