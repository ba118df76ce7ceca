use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a text field without failing the whole body, so that validation
/// can report every field.
///
/// `null` and structured values become an empty string and fail the
/// `length(min = 1)` rule. Numbers and booleans keep their text form.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::String(value) => value,
		Value::Number(value) => value.to_string(),
		Value::Bool(value) => value.to_string(),
		Value::Null | Value::Array(..) | Value::Object(..) => String::new(),
	})
}

#[cfg(test)]
mod test {
	use serde::Deserialize;

	#[derive(Deserialize)]
	struct Input {
		#[serde(default, deserialize_with = "super::lenient_string")]
		text: String,
	}

	fn text(value: serde_json::Value) -> String {
		serde_json::from_value::<Input>(value).unwrap().text
	}

	#[test]
	fn test_lenient_string() {
		assert_eq!(text(serde_json::json!({ "text": "hi" })), "hi");
		assert_eq!(text(serde_json::json!({ "text": 5 })), "5");
		assert_eq!(text(serde_json::json!({ "text": null })), "");
		assert_eq!(text(serde_json::json!({ "text": ["a"] })), "");
		assert_eq!(text(serde_json::json!({})), "");
	}
}
