//! Property-based tests for the license pipeline.
//!
//! Uses proptest to check serialization and integrity invariants over
//! randomly generated records.

mod common;

use autosoft_license::{
    build_with_checksum, canonicalize, canonicalize_value, is_expired, verify, LicenseRecord,
    LicenseType,
};
use chrono::{DateTime, Duration, Utc};
use common::{now, pipeline_at};
use proptest::prelude::*;

fn arb_license_type() -> impl Strategy<Value = LicenseType> {
    prop_oneof![
        Just(LicenseType::Demo),
        Just(LicenseType::Subscription),
        Just(LicenseType::Permanent),
    ]
}

/// Records that are active at [`common::now`].
fn arb_active_record() -> impl Strategy<Value = LicenseRecord> {
    (
        "[A-Za-z][A-Za-z0-9 &.,'-]{0,30}",
        "[A-Z][A-Z0-9-]{0,11}",
        "[A-Z][A-Z0-9-]{0,11}",
        "[A-Z0-9-]{1,32}",
        arb_license_type(),
        0i64..=3650,
        0i64..=3650,
        prop::collection::vec("[A-Z0-9-]{1,10}", 0..6),
    )
        .prop_map(|(company, product, dealer, key, license_type, back, ahead, modules)| {
            let mut record = LicenseRecord::new(
                company,
                product,
                license_type,
                now() - Duration::days(back),
                now() + Duration::days(ahead),
                key,
            )
            .with_dealer_code(dealer)
            .with_modules(modules);
            record.normalize();
            record
        })
}

// ============================================================================
// Canonical serialization
// ============================================================================

mod canonical_properties {
    use super::*;

    proptest! {
        #[test]
        fn canonicalize_is_deterministic(record in arb_active_record()) {
            prop_assert_eq!(canonicalize(&record), canonicalize(&record));
        }

        #[test]
        fn reparsing_canonical_text_is_stable(record in arb_active_record()) {
            let text = canonicalize(&record);
            let tree: serde_json::Value = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(canonicalize_value(&tree), text);
        }
    }
}

// ============================================================================
// Integrity
// ============================================================================

mod integrity_properties {
    use super::*;

    proptest! {
        #[test]
        fn built_text_always_verifies(record in arb_active_record()) {
            let text = build_with_checksum(&record).unwrap();
            let report = verify(&text);
            prop_assert!(report.valid);
            prop_assert_eq!(report.record.unwrap().without_checksum(), record);
        }

        #[test]
        fn changed_company_fails_verification(
            record in arb_active_record(),
            suffix in "[a-z]{1,4}",
        ) {
            let text = build_with_checksum(&record).unwrap();
            let mut tree: serde_json::Value = serde_json::from_str(&text).unwrap();
            tree["CompanyName"] = serde_json::Value::from(format!("{}{suffix}", record.company_name));
            prop_assert!(!verify(&tree.to_string()).valid);
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

mod pipeline_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn active_records_round_trip(record in arb_active_record()) {
            let pipeline = pipeline_at(now());
            let artifact = pipeline.generate_artifact(&record).unwrap();
            let imported = pipeline.import_artifact(&artifact).unwrap();
            prop_assert_eq!(imported.without_checksum(), record);
        }

        #[test]
        fn expiry_is_strictly_after_valid_to(offset in -86_400i64..86_400) {
            let valid_to: DateTime<Utc> = now();
            let at = valid_to + Duration::seconds(offset);
            prop_assert_eq!(is_expired(valid_to, at), offset > 0);
        }
    }
}
