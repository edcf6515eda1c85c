// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracked-field comparison for UPDATE audit gating.
//!
//! An UPDATE audit entry is only worth recording when something actually
//! changed. Comparison runs over an explicit enumerated list of tracked
//! field names per entity type and coerces every value to a string first
//! (null and missing both coerce to the empty string), so `null`, `""` and
//! an absent key all compare equal and a numeric `10` equals `"10"`.

use serde_json::Value;

/// String-coerce a single JSON value.
fn coerce_value(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		Value::Bool(b) => b.to_string(),
		Value::Number(n) => n.to_string(),
		other => other.to_string(),
	}
}

/// Look up a tracked field in a snapshot and coerce it.
fn coerced_field(state: &Value, field: &str) -> String {
	state.get(field).map(coerce_value).unwrap_or_default()
}

/// Returns true when at least one tracked field differs between the two
/// snapshots after string coercion.
///
/// A missing before or after snapshot always counts as a difference; the
/// gate only suppresses genuine no-op saves.
pub fn states_differ(before: Option<&Value>, after: Option<&Value>, fields: &[&str]) -> bool {
	let (Some(before), Some(after)) = (before, after) else {
		return true;
	};

	fields
		.iter()
		.any(|field| coerced_field(before, field) != coerced_field(after, field))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	const FIELDS: &[&str] = &["referencia", "cor", "x", "marked"];

	#[test]
	fn identical_snapshots_do_not_differ() {
		let state = json!({"referencia": "A1", "cor": "red", "x": 10, "marked": false});
		assert!(!states_differ(Some(&state), Some(&state.clone()), FIELDS));
	}

	#[test]
	fn changed_field_differs() {
		let before = json!({"referencia": "A1", "cor": "red"});
		let after = json!({"referencia": "A1", "cor": "blue"});
		assert!(states_differ(Some(&before), Some(&after), FIELDS));
	}

	#[test]
	fn null_and_missing_and_empty_compare_equal() {
		let before = json!({"referencia": "A1", "cor": null});
		let after_missing = json!({"referencia": "A1"});
		let after_empty = json!({"referencia": "A1", "cor": ""});
		assert!(!states_differ(Some(&before), Some(&after_missing), FIELDS));
		assert!(!states_differ(Some(&before), Some(&after_empty), FIELDS));
	}

	#[test]
	fn number_compares_equal_to_its_string_form() {
		let before = json!({"x": 10});
		let after = json!({"x": "10"});
		assert!(!states_differ(Some(&before), Some(&after), FIELDS));
	}

	#[test]
	fn bool_flip_differs() {
		let before = json!({"marked": false});
		let after = json!({"marked": true});
		assert!(states_differ(Some(&before), Some(&after), FIELDS));
	}

	#[test]
	fn untracked_fields_are_ignored() {
		let before = json!({"referencia": "A1", "updated_at": "2026-01-01"});
		let after = json!({"referencia": "A1", "updated_at": "2026-02-02"});
		assert!(!states_differ(Some(&before), Some(&after), FIELDS));
	}

	#[test]
	fn missing_snapshot_always_differs() {
		let state = json!({"referencia": "A1"});
		assert!(states_differ(None, Some(&state), FIELDS));
		assert!(states_differ(Some(&state), None, FIELDS));
		assert!(states_differ(None, None, FIELDS));
	}
}
