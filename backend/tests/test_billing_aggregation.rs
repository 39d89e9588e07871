//! Integration tests for call aggregation and billing
//!
//! Tests cover:
//! - Aggregating decoded record sets, including malformed records
//! - Idempotence and order independence of totals
//! - Usage and channel charges against the product rate schedule

use callwave_core_rs::billing::{aggregate_segments, parse_records};
use callwave_core_rs::{aggregate, bill, CallRecord, CallStatus, UsageRateSchedule};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Helper: a small mixed record set as the records source returns it
fn sample_json() -> &'static str {
    r#"[
        {"status": "completed", "duration": 120, "cost": 5.04, "startedAt": "2026-03-01T09:00:00Z"},
        {"status": "no-answer", "duration": 0, "cost": 0},
        {"status": "connected", "duration": "45.5", "cost": "1.911"},
        {"status": "failed"},
        {"duration": 12, "cost": 0.5}
    ]"#
}

#[test]
fn test_aggregate_decoded_records() {
    let records = parse_records(sample_json()).unwrap();
    let stats = aggregate(&records);

    assert_eq!(stats.total_calls, 5);
    assert_eq!(stats.connected_calls, 2);
    assert_eq!(stats.total_duration, 177.5);
    assert!((stats.total_cost - 7.451).abs() < 1e-9);
    assert_eq!(stats.pickup_rate(), 40.0);
}

#[test]
fn test_malformed_record_contributes_zero() {
    let records = parse_records(
        r#"[
            {"status": "completed", "duration": null, "cost": "n/a"},
            {"status": "completed", "duration": 60, "cost": 2.52}
        ]"#,
    )
    .unwrap();
    let stats = aggregate(&records);

    assert_eq!(stats.total_calls, 2);
    assert_eq!(stats.connected_calls, 2);
    assert_eq!(stats.total_duration, 60.0);
    assert_eq!(stats.total_cost, 2.52);
}

#[test]
fn test_garbage_entries_do_not_halt_aggregation() {
    let records =
        parse_records(r#"[42, "oops", null, [], {"status": "connected", "duration": 10}]"#)
            .unwrap();
    let stats = aggregate(&records);

    assert_eq!(stats.total_calls, 5);
    assert_eq!(stats.connected_calls, 1);
    assert_eq!(stats.total_duration, 10.0);
}

#[test]
fn test_missing_collection_is_empty() {
    let records = parse_records("null").unwrap();
    let stats = aggregate(&records);
    assert_eq!(stats.total_calls, 0);
    assert_eq!(stats.pickup_rate(), 0.0);
}

#[test]
fn test_aggregate_twice_is_bit_identical() {
    let records = parse_records(sample_json()).unwrap();
    let first = aggregate(&records);
    let second = aggregate(&records);

    assert_eq!(first.total_duration.to_bits(), second.total_duration.to_bits());
    assert_eq!(first.total_cost.to_bits(), second.total_cost.to_bits());
    assert_eq!(first, second);
}

#[test]
fn test_reference_bill() {
    let rates = UsageRateSchedule {
        per_second_rate: 0.042,
        channel_monthly_fee: 1200.0,
        free_channels: 2,
    };
    let summary = bill(10_000.0, 5, &rates).rounded(2);

    assert_eq!(summary.usage_charges, 420.0);
    assert_eq!(summary.channel_charges, 3600.0);
    assert_eq!(summary.combined_total, 4020.0);
}

#[test]
fn test_bill_from_aggregated_duration() {
    let records = vec![
        CallRecord::new(CallStatus::Completed, 6_000.0, 0.0),
        CallRecord::new(CallStatus::Connected, 4_000.0, 0.0),
    ];
    let stats = aggregate(&records);
    let summary = bill(stats.total_duration, 2, &UsageRateSchedule::default());

    assert_eq!(summary.channel_charges, 0.0);
    assert_eq!(summary.rounded(2).combined_total, 420.0);
}

#[test]
fn test_segment_report() {
    let mut segments = BTreeMap::new();
    segments.insert(
        "reactivation".to_string(),
        parse_records(r#"[{"status": "completed", "duration": 30, "cost": 1.26}]"#).unwrap(),
    );
    segments.insert("empty".to_string(), Vec::new());

    let report = aggregate_segments(&segments);
    assert_eq!(report.segments["empty"].total_calls, 0);
    assert_eq!(report.segments["reactivation"].connected_calls, 1);
    assert_eq!(report.total.total_calls, 1);
}

fn arb_record() -> impl Strategy<Value = CallRecord> {
    let status = prop_oneof![
        Just(CallStatus::Completed),
        Just(CallStatus::Connected),
        Just(CallStatus::Failed),
        Just(CallStatus::NoAnswer),
        Just(CallStatus::Unknown),
    ];
    (status, 0.0f64..10_000.0, 0.0f64..500.0)
        .prop_map(|(status, duration, cost)| CallRecord::new(status, duration, cost))
}

proptest! {
    #[test]
    fn prop_order_does_not_change_totals(
        records in prop::collection::vec(arb_record(), 0..200),
        seed in any::<u64>()
    ) {
        let forward = aggregate(&records);

        let mut reversed = records.clone();
        reversed.reverse();
        let backward = aggregate(&reversed);

        let mut rotated = records.clone();
        if !rotated.is_empty() {
            let by = (seed as usize) % rotated.len();
            rotated.rotate_left(by);
        }
        let shifted = aggregate(&rotated);

        prop_assert_eq!(forward.total_duration.to_bits(), backward.total_duration.to_bits());
        prop_assert_eq!(forward.total_cost.to_bits(), backward.total_cost.to_bits());
        prop_assert_eq!(forward, shifted);
    }

    #[test]
    fn prop_connected_never_exceeds_total(records in prop::collection::vec(arb_record(), 0..100)) {
        let stats = aggregate(&records);
        prop_assert!(stats.connected_calls <= stats.total_calls);
        prop_assert!(stats.pickup_rate() >= 0.0 && stats.pickup_rate() <= 100.0);
    }

    #[test]
    fn prop_bill_is_non_negative(seconds in 0.0f64..1e7, channels in 0u32..100) {
        let summary = bill(seconds, channels, &UsageRateSchedule::default());
        prop_assert!(summary.usage_charges >= 0.0);
        prop_assert!(summary.channel_charges >= 0.0);
        prop_assert_eq!(summary.combined_total, summary.usage_charges + summary.channel_charges);
    }
}
