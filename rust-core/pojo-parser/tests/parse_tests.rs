// SPDX-License-Identifier: PMPL-1.0-or-later
//! Line parser tests against a realistic settings document

use pojo_parser::{
    parse_line, strip_leading, CursorLocation, FieldValue, ParseError, WarningKind,
};
use pojo_schema::SchemaRegistry;

const SETTINGS: &str = r#"{
    "split_separator": ";",
    "daily_entries": ["Daily"],
    "databases": [
        {
            "database": "Exercise",
            "type": "Type",
            "params": ["Duration", "Description"],
            "fields": {
                "Type": { "allowed": "fixed", "values": { "_ALL": ["Run", "Swim"] } },
                "Duration": { "allowed": "history" }
            }
        },
        {
            "database": "Meal",
            "type": "Course",
            "params": ["Food", "Place", "Mood", "Description"],
            "fields": {
                "Course": { "allowed": "fixed", "values": { "_ALL": ["Breakfast", "Lunch", "Dinner"] } },
                "Food": { "allowed": "history-type", "multi": "," },
                "Place": { "allowed": "history" },
                "Mood": { "allowed": "fixed", "values": {
                    "_ALL": ["Happy", "Sad"],
                    "Dinner": ["Sleepy", "Happy"]
                } }
            }
        }
    ]
}"#;

fn registry() -> SchemaRegistry {
    SchemaRegistry::from_json_str(SETTINGS).unwrap()
}

#[test]
fn test_full_exercise_line() {
    let registry = registry();
    let outcome = parse_line(&registry, "Exercise/Run 30;felt great").unwrap();
    let record = outcome.record;

    assert_eq!(record.database, "Exercise");
    assert_eq!(record.type_value.as_deref(), Some("Run"));
    assert_eq!(record.param("Duration"), Some(&FieldValue::Single("30".to_string())));
    assert_eq!(record.description, ["felt great"]);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_fixed_type_gets_canonical_case() {
    let registry = registry();
    let outcome = parse_line(&registry, "exercise/RUN 45").unwrap();
    assert_eq!(outcome.record.database, "Exercise");
    assert_eq!(outcome.record.type_value.as_deref(), Some("Run"));
}

#[test]
fn test_unknown_type_is_soft() {
    let registry = registry();
    let outcome = parse_line(&registry, "Exercise/Bike 30").unwrap();
    assert_eq!(outcome.record.type_value.as_deref(), Some("Bike"));
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].kind, WarningKind::UnknownType);
    assert_eq!(outcome.warnings[0].allowed, ["Run", "Swim"]);
    // Parameters are still parsed.
    assert_eq!(
        outcome.record.param("Duration"),
        Some(&FieldValue::Single("30".to_string()))
    );
}

#[test]
fn test_unknown_database_is_invalid() {
    let registry = registry();
    assert_eq!(
        parse_line(&registry, "UnknownDb/Foo 1;2;3;4"),
        Err(ParseError::UnknownDatabase("UnknownDb".to_string()))
    );
}

#[test]
fn test_too_many_segments_is_invalid() {
    let registry = registry();
    let err = parse_line(&registry, "Exercise/Run 1;2;3").unwrap_err();
    assert_eq!(
        err,
        ParseError::TooManyParameters {
            database: "Exercise".to_string(),
            expected: 2,
            found: 3,
        }
    );
}

#[test]
fn test_empty_segment_keeps_alignment() {
    let registry = registry();
    let outcome = parse_line(&registry, "Meal/Lunch ;cafe;happy").unwrap();
    let record = outcome.record;
    assert!(record.param("Food").is_none());
    assert_eq!(record.param("Place"), Some(&FieldValue::Single("Cafe".to_string())));
    assert_eq!(record.param("Mood"), Some(&FieldValue::Single("Happy".to_string())));
}

#[test]
fn test_multi_value_field_is_split_and_normalized() {
    let registry = registry();
    let outcome = parse_line(&registry, "Meal/Dinner pasta, red wine ,, salad").unwrap();
    assert_eq!(
        outcome.record.param("Food"),
        Some(&FieldValue::Multi(vec![
            "Pasta".to_string(),
            "Red Wine".to_string(),
            "Salad".to_string()
        ]))
    );
}

#[test]
fn test_type_scoped_fixed_values() {
    let registry = registry();

    let dinner = parse_line(&registry, "Meal/Dinner Soup;Home;sleepy").unwrap();
    assert!(dinner.warnings.is_empty());
    assert_eq!(
        dinner.record.param("Mood"),
        Some(&FieldValue::Single("Sleepy".to_string()))
    );

    let lunch = parse_line(&registry, "Meal/Lunch Soup;Home;sleepy").unwrap();
    assert_eq!(lunch.warnings.len(), 1);
    assert_eq!(lunch.warnings[0].kind, WarningKind::ValueNotAllowed);
    assert_eq!(lunch.warnings[0].field, "Mood");
    assert_eq!(
        lunch.record.param("Mood"),
        Some(&FieldValue::Single("Sleepy".to_string()))
    );
}

#[test]
fn test_invalid_type_still_scopes_parameters() {
    let registry = registry();
    let outcome = parse_line(&registry, "Meal/Brunch Eggs;Home;Sad").unwrap();
    assert_eq!(outcome.record.type_value.as_deref(), Some("Brunch"));
    // Falls back to the `_ALL` list, where Sad is allowed.
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].kind, WarningKind::UnknownType);
}

#[test]
fn test_location_is_last_segment() {
    let registry = registry();
    let outcome = parse_line(&registry, "Meal/Lunch Soup; ca").unwrap();
    assert_eq!(
        outcome.record.location,
        Some(CursorLocation::Parameter {
            name: "Place".to_string(),
            partial: " ca".to_string(),
        })
    );

    let outcome = parse_line(&registry, "Meal/Lunch Soup;").unwrap();
    assert_eq!(
        outcome.record.location,
        Some(CursorLocation::Parameter {
            name: "Place".to_string(),
            partial: String::new(),
        })
    );
}

#[test]
fn test_database_with_trailing_space_keeps_database_location() {
    let registry = registry();
    let outcome = parse_line(&registry, "Exercise ").unwrap();
    assert_eq!(outcome.record.database, "Exercise");
    assert!(outcome.record.type_value.is_none());
    assert_eq!(
        outcome.record.location,
        Some(CursorLocation::Database {
            partial: "Exercise".to_string()
        })
    );
}

#[test]
fn test_non_ascii_type_selects_its_scoped_values() {
    let registry = SchemaRegistry::from_json_str(
        r#"{ "databases": [{
            "database": "Sport",
            "type": "Type",
            "params": ["Gear"],
            "fields": {
                "Type": { "allowed": "fixed", "values": { "_ALL": ["Épée", "Foil"] } },
                "Gear": { "allowed": "fixed", "values": {
                    "épée": ["Mask"],
                    "_ALL": ["Ball"]
                } }
            }
        }] }"#,
    )
    .unwrap();

    let outcome = parse_line(&registry, "Sport/ÉPÉE mask").unwrap();
    assert_eq!(outcome.record.type_value.as_deref(), Some("Épée"));
    assert_eq!(
        outcome.record.param("Gear"),
        Some(&FieldValue::Single("Mask".to_string()))
    );
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_description_is_not_normalized() {
    let registry = registry();
    let outcome = parse_line(&registry, "Meal/Lunch Soup;Home;Happy;lovely view").unwrap();
    assert_eq!(outcome.record.description, ["lovely view"]);
}

#[test]
fn test_stripped_heading_line() {
    let registry = registry();
    let line = strip_leading("### Exercise/Swim 20").unwrap();
    let outcome = parse_line(&registry, line).unwrap();
    assert_eq!(outcome.record.type_value.as_deref(), Some("Swim"));
}

#[test]
fn test_empty_line() {
    let registry = registry();
    assert_eq!(parse_line(&registry, "   "), Err(ParseError::Empty));
}
