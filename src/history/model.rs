use std::fmt;

use jiff::{SignedDuration, Timestamp, civil::DateTime, tz::TimeZone};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Number, Value};

use crate::key::Id;

use super::error::HistoryError;

/// History exactly as it arrives on the wire.
///
/// `elapsed_times` holds deltas-of-deltas, each tag's `elapsed_indexes`
/// holds deltas, and `values` is encoded according to the tag's type.
/// Only [`super::decode()`] should look inside.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHistory {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(deserialize_with = "wire_time")]
    pub start: Timestamp,
    #[serde(deserialize_with = "wire_time")]
    pub end: Timestamp,
    pub elapsed_times: Vec<i64>,
    pub tags: Vec<RawTag>,
    #[serde(default)]
    pub commands: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTag {
    #[serde(flatten)]
    pub def: TagDef,
    #[serde(default)]
    pub elapsed_indexes: Vec<i64>,
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TagType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Either a plain type name (`"number"`, `"boolean"`, ...) or a structured
/// descriptor such as an enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagType {
    Named(String),
    Structured(Map<String, Value>),
}

impl TagType {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Structured(_) => None,
        }
    }
}

/// Decoded history, all offsets and values absolute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub start: Timestamp,
    pub end: Timestamp,
    /// ms since `start`, non-decreasing
    pub elapsed_times: Vec<i64>,
    pub tags: Vec<HistoryTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryTag {
    #[serde(flatten)]
    pub def: TagDef,
    /// rows at which the tag changed, strictly increasing
    pub elapsed_indexes: Vec<usize>,
    /// one per elapsed index
    pub values: Vec<TagValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Null,
    Bool(bool),
    Int(i64),
    /// accumulated delta that left the integers
    Float(f64),
    /// wire number outside `i64`, kept exact
    Number(Number),
    Text(String),
    Json(Value),
}

impl History {
    pub fn tag(&self, name: &str) -> Option<&HistoryTag> {
        self.tags.iter().find(|tag| tag.def.name == name)
    }

    pub fn time_at(&self, elapsed: i64) -> Result<Timestamp, HistoryError> {
        self.start
            .checked_add(SignedDuration::from_millis(elapsed))
            .map_err(|_| HistoryError::TimeOutOfRange(elapsed))
    }
}

impl HistoryTag {
    /// Last value recorded at or before `row`
    pub fn value_at(&self, row: usize) -> Option<&TagValue> {
        let seen = self.elapsed_indexes.partition_point(|&index| index <= row);
        seen.checked_sub(1).and_then(|last| self.values.get(last))
    }
}

impl TagValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Number(n),
            },
            Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => match Number::from_f64(*x) {
                Some(n) => write!(f, "{n}"),
                None => write!(f, "{x:?}"),
            },
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireTime {
    Millis(i64),
    Text(String),
}

/// RFC 3339 text, offset-less text (taken as UTC), or epoch milliseconds
fn wire_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
    match WireTime::deserialize(deserializer)? {
        WireTime::Millis(ms) => Timestamp::from_millisecond(ms).map_err(de::Error::custom),
        WireTime::Text(s) => s
            .parse::<Timestamp>()
            .or_else(|_| {
                s.parse::<DateTime>()
                    .and_then(|dt| dt.to_zoned(TimeZone::UTC))
                    .map(|zdt| zdt.timestamp())
            })
            .map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn tag(indexes: Vec<usize>, values: Vec<TagValue>) -> HistoryTag {
        HistoryTag {
            def: TagDef {
                name: "Temp".to_string(),
                kind: TagType::Named("number".to_string()),
                category: None,
                description: None,
                minimum: None,
                maximum: None,
                io: None,
                trace: None,
                format: None,
            },
            elapsed_indexes: indexes,
            values,
        }
    }

    #[test]
    fn test_value_at_forward_fills() {
        let tag = tag(vec![1, 4], vec![TagValue::Int(5), TagValue::Int(9)]);
        assert_eq!(tag.value_at(0), None);
        assert_eq!(tag.value_at(1), Some(&TagValue::Int(5)));
        assert_eq!(tag.value_at(3), Some(&TagValue::Int(5)));
        assert_eq!(tag.value_at(4), Some(&TagValue::Int(9)));
        assert_eq!(tag.value_at(100), Some(&TagValue::Int(9)));
    }

    #[test]
    fn test_tag_value_from_json() {
        assert_eq!(TagValue::from_json(json!(null)), TagValue::Null);
        assert_eq!(TagValue::from_json(json!(3)), TagValue::Int(3));
        assert_eq!(
            TagValue::from_json(json!(2.5)),
            TagValue::Number(Number::from_f64(2.5).unwrap())
        );
        assert_eq!(
            TagValue::from_json(json!(u64::MAX)),
            TagValue::Number(u64::MAX.into())
        );
        assert_eq!(TagValue::from_json(json!("Idle")), TagValue::Text("Idle".to_string()));
        assert_eq!(
            TagValue::from_json(json!({"a": 1})),
            TagValue::Json(json!({"a": 1}))
        );
    }

    #[test]
    fn test_tag_value_text() {
        assert_eq!(TagValue::Null.to_string(), "");
        assert_eq!(TagValue::Bool(true).to_string(), "true");
        assert_eq!(TagValue::Int(-4).to_string(), "-4");
        assert_eq!(TagValue::Float(0.25).to_string(), "0.25");
        assert_eq!(TagValue::Float(3.0).to_string(), "3.0");
        assert_eq!(TagValue::from_json(json!(3.0)).to_string(), "3.0");
        assert_eq!(
            TagValue::from_json(json!(u64::MAX)).to_string(),
            "18446744073709551615"
        );
        assert_eq!(TagValue::Json(json!([1, 2])).to_string(), "[1,2]");
    }

    #[test]
    fn test_tag_type_shapes() {
        let def: TagDef = serde_json::from_value(json!({
            "name": "Mode",
            "type": {"enum": ["Run", "Stop"]},
            "category": "Status"
        }))
        .unwrap();
        assert_eq!(def.kind.name(), None);
        assert_eq!(def.category.as_deref(), Some("Status"));

        let def: TagDef =
            serde_json::from_value(json!({"name": "Temp", "type": "number", "minimum": 0}))
                .unwrap();
        assert_eq!(def.kind.name(), Some("number"));
        assert_eq!(def.minimum, Some(0.0));
    }
}
