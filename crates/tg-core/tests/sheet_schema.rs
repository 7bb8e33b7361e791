//! JsonSchema validation tests for the weekly sheet input format.

use chrono::NaiveDate;
use schemars::schema_for;
use tg_core::sheet::{Booking, WeekSheet};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn sheet_schema() -> serde_json::Value {
    serde_json::to_value(schema_for!(WeekSheet)).unwrap()
}

#[test]
fn serialized_sheet_matches_schema() {
    let sheet = WeekSheet {
        user_id: "thies".to_string(),
        week_start: NaiveDate::from_ymd_opt(2008, 3, 31).unwrap(),
        comment: Some("release week".to_string()),
        bookings: vec![
            Booking {
                assignment_id: 1,
                date: NaiveDate::from_ymd_opt(2008, 4, 1).unwrap(),
                hours: Some(8.0),
                comment: Some("deploy".to_string()),
            },
            Booking {
                assignment_id: 1,
                date: NaiveDate::from_ymd_opt(2008, 4, 2).unwrap(),
                hours: None,
                comment: None,
            },
        ],
    };

    let instance = serde_json::to_value(&sheet).unwrap();
    let errors = validate_against_schema(&sheet_schema(), &instance);
    assert!(errors.is_empty(), "schema errors: {errors:?}");
}

#[test]
fn sheet_without_user_is_rejected() {
    let instance = serde_json::json!({
        "week_start": "2008-03-31",
        "bookings": []
    });
    let errors = validate_against_schema(&sheet_schema(), &instance);
    assert!(!errors.is_empty());
}

#[test]
fn booking_with_text_hours_is_rejected() {
    let instance = serde_json::json!({
        "user_id": "thies",
        "week_start": "2008-03-31",
        "bookings": [{ "assignment_id": 1, "date": "2008-04-01", "hours": "eight" }]
    });
    let errors = validate_against_schema(&sheet_schema(), &instance);
    assert!(!errors.is_empty());
}
