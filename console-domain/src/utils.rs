// Wire normalization helpers
//
// The backend is loose about scalar types: ids, counters and timestamps arrive
// as numbers or strings depending on the endpoint. These helpers are used as
// `deserialize_with` targets so entities only ever hold canonical types.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::value_objects::EpochMillis;

pub fn current_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Epoch millis from a number, a numeric string, an RFC 3339 string or a
/// `YYYY-MM-DD HH:MM:SS` string (read as UTC).
pub fn parse_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            if let Ok(millis) = raw.parse::<i64>() {
                return Some(millis);
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                return Some(dt.with_timezone(&Utc).timestamp_millis());
            }
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc().timestamp_millis())
        }
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => normalize_optional_text(Some(raw.clone())),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

pub fn scalar_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(raw) => raw.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Text field that upstream sometimes sends as `null`.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => raw,
        Some(other @ (Value::Number(_) | Value::Bool(_))) => other.to_string(),
        _ => String::new(),
    })
}

pub fn optional_millis<'de, D>(deserializer: D) -> Result<Option<EpochMillis>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_millis).map(EpochMillis))
}

pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text).unwrap_or_default())
}

pub fn optional_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text))
}

pub fn optional_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(scalar_u64)
        .map(|n| n.min(u32::MAX as u64) as u32))
}

pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_u64).unwrap_or(0))
}

/// Decimal amounts come as strings upstream; unparsable values become 0.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_millis_supports_space_separated_dates() {
        assert_eq!(parse_millis(&json!("1970-01-01 00:00:01")), Some(1_000));
        assert_eq!(parse_millis(&json!("")), None);
        assert_eq!(parse_millis(&Value::Null), None);
    }

    #[test]
    fn normalize_optional_text_trims_and_drops_blank() {
        assert_eq!(normalize_optional_text(Some("  a ".into())), Some("a".into()));
        assert_eq!(normalize_optional_text(Some("   ".into())), None);
        assert_eq!(normalize_optional_text(None), None);
    }

    #[derive(Deserialize)]
    struct LooseRecord {
        #[serde(default, deserialize_with = "id_string")]
        id: String,
        #[serde(default, deserialize_with = "optional_u32")]
        pages: Option<u32>,
        #[serde(default, deserialize_with = "lenient_u64")]
        total: u64,
        #[serde(default, deserialize_with = "lenient_f64")]
        amount: f64,
        #[serde(default, deserialize_with = "optional_millis")]
        at: Option<EpochMillis>,
    }

    #[test]
    fn mixed_scalar_fields_normalize() {
        let record: LooseRecord = serde_json::from_value(json!({
            "id": 17,
            "pages": "4",
            "total": "120",
            "amount": "12.50",
            "at": null
        }))
        .expect("decode record");

        assert_eq!(record.id, "17");
        assert_eq!(record.pages, Some(4));
        assert_eq!(record.total, 120);
        assert!((record.amount - 12.5).abs() < f64::EPSILON);
        assert_eq!(record.at, None);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let record: LooseRecord = serde_json::from_value(json!({ "amount": "n/a" })).expect("decode");
        assert_eq!(record.id, "");
        assert_eq!(record.pages, None);
        assert_eq!(record.total, 0);
        assert_eq!(record.amount, 0.0);
    }
}
