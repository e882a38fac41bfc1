pub mod ai_responses;
pub mod commercialization;

use schemars::JsonSchema;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

pub use ai_responses::*;
pub use commercialization::*;

/// A response shape the model must produce for one structured call.
pub trait StructuredResponse: DeserializeOwned + JsonSchema + Send {
    const NAME: &'static str;

    /// Machine-readable description embedded into the system prompt.
    fn schema() -> Value {
        serde_json::to_value(schemars::schema_for!(Self)).unwrap_or_default()
    }

    /// Constraints that deserialization alone does not enforce.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Truncates `f` when it fits an `i64`; NaN, infinities and overflow fail.
fn float_to_int(f: f64) -> Option<i64> {
    let truncated = f.trunc();
    // 2^63 itself does not fit, so the upper bound is exclusive.
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(float_to_int)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_to_int))
        }
        _ => None,
    }
}

/// Integer that the model may have written as a float or a numeric string.
pub(crate) fn flexible_optional_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => value_to_int(&v)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected an integer, got {v}"))),
    }
}

pub(crate) fn flexible_int_map<'de, D>(
    deserializer: D,
) -> Result<std::collections::BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = std::collections::BTreeMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| match value_to_int(&value) {
            Some(n) => Ok((key, n)),
            None => Err(de::Error::custom(format!(
                "expected an integer for '{key}', got {value}"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_to_int_accepts_numeric_strings_and_floats() {
        assert_eq!(value_to_int(&serde_json::json!(12)), Some(12));
        assert_eq!(value_to_int(&serde_json::json!(12.9)), Some(12));
        assert_eq!(value_to_int(&serde_json::json!(" 250 ")), Some(250));
        assert_eq!(value_to_int(&serde_json::json!("7.5")), Some(7));
        assert_eq!(value_to_int(&serde_json::json!("a lot")), None);
        assert_eq!(value_to_int(&serde_json::json!([1])), None);
    }

    #[test]
    fn value_to_int_rejects_non_finite_and_out_of_range() {
        assert_eq!(value_to_int(&serde_json::json!("NaN")), None);
        assert_eq!(value_to_int(&serde_json::json!("nan")), None);
        assert_eq!(value_to_int(&serde_json::json!("infinity")), None);
        assert_eq!(value_to_int(&serde_json::json!("-inf")), None);
        assert_eq!(value_to_int(&serde_json::json!(1e30)), None);
        assert_eq!(value_to_int(&serde_json::json!("1e30")), None);
        assert_eq!(value_to_int(&serde_json::json!(-1e19)), None);
        assert_eq!(value_to_int(&serde_json::json!(i64::MAX)), Some(i64::MAX));
    }

    #[test]
    fn unrepresentable_counts_fail_deserialization() {
        let weight = serde_json::from_str::<IngredientEnrichment>(r#"{"weight": "NaN"}"#);
        assert!(weight.is_err());
        let weight = serde_json::from_str::<IngredientEnrichment>(r#"{"weight": "infinity"}"#);
        assert!(weight.is_err());

        let portal = serde_json::from_value::<InsightPortalData>(serde_json::json!({
            "shared_product_concepts": [],
            "company_competitors": [],
            "assistant_recommendations": {"opportunity": "o", "risk": "r"},
            "demography_data": {"18-24": "nan", "25-34": 1e30},
            "gender_bias": {"male": 0.5, "female": 0.5},
            "top_geographic_locations": []
        }));
        assert!(portal.is_err());
    }
}
