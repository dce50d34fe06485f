//! Property tests for the editor invariants: idempotence, round-trip
//! fidelity, and string-safety under generated names and values.

use proptest::prelude::*;

proptest! {
    #[test]
    fn ensure_is_idempotent(base in "[a-z]{1,10}", val in "[a-z0-9_./:-]{1,16}") {
        let key = format!("k_{base}");
        let text = format!(
            "{{\n  \"name\": \"app\", // keep\n  \"{key}\": [\"seed\"]\n}}"
        );
        let snapshot = jsonc_splice::parse_snapshot(&text).unwrap();
        let once = jsonc_splice::ensure_array_contains_value(&text, &snapshot, &key, &val).unwrap();
        let snapshot_once = jsonc_splice::parse_snapshot(&once).unwrap();
        let twice =
            jsonc_splice::ensure_array_contains_value(&once, &snapshot_once, &key, &val).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.contains("// keep"));
    }

    #[test]
    fn remove_matches_raw_values_safely(val in "[a-z{}\\[\\]/*,:. ]{1,20}") {
        let encoded = serde_json::Value::String(val.clone()).to_string();
        let text = format!(
            "{{\"dbs\": [{{\"database_name\": {encoded}}},{{\"database_name\": \"keep\"}}]}}"
        );
        let out =
            jsonc_splice::remove_array_element_by_field(&text, "dbs", "database_name", &val)
                .unwrap();
        let snapshot = jsonc_splice::parse_snapshot(&out).unwrap();
        prop_assert_eq!(
            &snapshot["dbs"],
            &serde_json::json!([{"database_name": "keep"}])
        );
    }

    #[test]
    fn insert_round_trips_any_printable_value(val in "[ -~]{0,20}") {
        let element = serde_json::Value::String(val.clone()).to_string();
        let text = "{\n  \"flags\": [\"a\"] // tail\n}";
        let out = jsonc_splice::insert_array_element(text, "flags", &element).unwrap();
        let snapshot = jsonc_splice::parse_snapshot(&out).unwrap();
        prop_assert_eq!(&snapshot["flags"], &serde_json::json!(["a", val]));
        prop_assert!(out.contains("// tail"));
    }
}
