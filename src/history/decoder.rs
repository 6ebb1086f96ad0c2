use serde_json::Value;
use tracing::{Level, debug, span, warn};

use super::{
    error::{HistoryError, TagFault},
    model::{History, HistoryTag, RawHistory, RawTag, TagType, TagValue},
};

/// How a tag's `values` are compacted on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCodec {
    /// Successive differences of the absolute value (`number`, `date`)
    Delta,
    /// Initial value only, every recorded index is a toggle (`boolean`)
    Toggle,
    /// Carried verbatim
    Raw,
}

impl ValueCodec {
    pub fn for_type(kind: &TagType) -> Self {
        match kind.name() {
            Some("number") | Some("date") => Self::Delta,
            Some("boolean") => Self::Toggle,
            _ => Self::Raw,
        }
    }

    /// `indexes` is the number of recorded elapsed indexes for the tag
    pub fn decode(self, values: Vec<Value>, indexes: usize) -> Result<Vec<TagValue>, TagFault> {
        match self {
            Self::Delta => {
                check_arity(&values, indexes)?;
                let mut sum = Sum::Int(0);
                values
                    .iter()
                    .enumerate()
                    .map(|(pos, delta)| -> Result<TagValue, TagFault> {
                        sum = sum.add(pos, delta)?;
                        Ok(sum.into())
                    })
                    .collect()
            }
            Self::Toggle => {
                if indexes == 0 {
                    return Ok(Vec::new());
                }
                let mut values = values.into_iter();
                let Some(first) = values.next() else {
                    return Err(TagFault::MissingInitialValue(indexes));
                };
                let Value::Bool(mut last) = first else {
                    return Err(TagFault::NotBoolean);
                };
                if values.len() > 0 {
                    warn!(ignored = values.len(), "boolean tag carries more than its initial value");
                }

                let mut res = Vec::with_capacity(indexes);
                res.push(TagValue::Bool(last));
                for _ in 1..indexes {
                    last = !last;
                    res.push(TagValue::Bool(last));
                }
                Ok(res)
            }
            Self::Raw => {
                check_arity(&values, indexes)?;
                Ok(values.into_iter().map(TagValue::from_json).collect())
            }
        }
    }
}

fn check_arity(values: &[Value], indexes: usize) -> Result<(), TagFault> {
    if values.len() != indexes {
        return Err(TagFault::ArityMismatch {
            values: values.len(),
            indexes,
        });
    }
    Ok(())
}

/// Running total that stays integral until a float shows up
#[derive(Debug, Clone, Copy)]
enum Sum {
    Int(i64),
    Float(f64),
}

impl Sum {
    fn add(self, pos: usize, delta: &Value) -> Result<Self, TagFault> {
        let Value::Number(n) = delta else {
            return Err(TagFault::NotNumeric(pos));
        };
        match (self, n.as_i64()) {
            (Self::Int(acc), Some(d)) => acc
                .checked_add(d)
                .map(Self::Int)
                .ok_or(TagFault::Overflow(pos)),
            (acc, _) => {
                let d = n.as_f64().ok_or(TagFault::NotNumeric(pos))?;
                Ok(Self::Float(acc.as_f64() + d))
            }
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(x) => x,
        }
    }
}

impl From<Sum> for TagValue {
    fn from(value: Sum) -> Self {
        match value {
            Sum::Int(i) => Self::Int(i),
            Sum::Float(x) => Self::Float(x),
        }
    }
}

/// A falsy payload means the server found no history
fn is_absent(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Decodes a history payload as returned by the `history` resource.
/// Returns `None` when the payload says there is no history.
pub fn decode_payload(payload: Value) -> Result<Option<History>, HistoryError> {
    if is_absent(&payload) {
        debug!("payload holds no history");
        return Ok(None);
    }
    let raw: RawHistory = serde_json::from_value(payload)?;
    decode(raw).map(Some)
}

pub fn decode(raw: RawHistory) -> Result<History, HistoryError> {
    let span = span!(Level::INFO, "decode history", tags = raw.tags.len());
    let _enter = span.enter();

    let elapsed_times = decode_elapsed_times(&raw.elapsed_times)?;
    let mut history = History {
        id: raw.id,
        start: raw.start,
        end: raw.end,
        elapsed_times,
        tags: Vec::with_capacity(raw.tags.len()),
        commands: raw.commands,
    };
    if let Some(&last) = history.elapsed_times.last() {
        history.time_at(last)?;
    }

    for (index, tag) in raw.tags.into_iter().enumerate() {
        let name = tag.def.name.clone();
        let decoded = decode_tag(tag, history.elapsed_times.len())
            .map_err(|fault| HistoryError::Tag { index, tag: name, fault })?;
        history.tags.push(decoded);
    }

    debug!(rows = history.elapsed_times.len(), "decoded");
    Ok(history)
}

/// Undoes the second-order delta: each wire entry is added to a running
/// interval, and the interval to the running offset.
fn decode_elapsed_times(wire: &[i64]) -> Result<Vec<i64>, HistoryError> {
    let (mut interval, mut offset) = (0i64, 0i64);
    wire.iter()
        .enumerate()
        .map(|(i, &delta)| -> Result<i64, HistoryError> {
            interval = interval
                .checked_add(delta)
                .ok_or(HistoryError::ElapsedOverflow(i))?;
            if interval < 0 {
                return Err(HistoryError::NegativeInterval(i));
            }
            offset = offset
                .checked_add(interval)
                .ok_or(HistoryError::ElapsedOverflow(i))?;
            Ok(offset)
        })
        .collect()
}

fn decode_indexes(wire: &[i64], len: usize) -> Result<Vec<usize>, TagFault> {
    let mut index = 0i64;
    wire.iter()
        .enumerate()
        .map(|(pos, &delta)| -> Result<usize, TagFault> {
            if pos > 0 && delta <= 0 {
                return Err(TagFault::NonIncreasingIndex(pos));
            }
            index = index.checked_add(delta).ok_or(TagFault::Overflow(pos))?;
            usize::try_from(index)
                .ok()
                .filter(|&i| i < len)
                .ok_or(TagFault::IndexOutOfRange { index, len })
        })
        .collect()
}

fn decode_tag(tag: RawTag, len: usize) -> Result<HistoryTag, TagFault> {
    let span = span!(Level::DEBUG, "tag", name = %tag.def.name);
    let _enter = span.enter();

    let elapsed_indexes = decode_indexes(&tag.elapsed_indexes, len)?;
    let codec = ValueCodec::for_type(&tag.def.kind);
    let values = codec.decode(tag.values, elapsed_indexes.len())?;
    Ok(HistoryTag {
        def: tag.def,
        elapsed_indexes,
        values,
    })
}
