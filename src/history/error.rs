use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize, PartialEq)]
pub enum HistoryError {
    #[error("malformed history payload `{0}`")]
    Payload(String),
    #[error("elapsed time {0} decodes to a negative interval")]
    NegativeInterval(usize),
    #[error("elapsed time {0} overflows")]
    ElapsedOverflow(usize),
    #[error("elapsed time {0}ms is outside the representable time range")]
    TimeOutOfRange(i64),
    #[error("tag #{index} `{tag}`: {fault}")]
    Tag {
        index: usize,
        tag: String,
        fault: TagFault,
    },
}

#[derive(Error, Debug, Serialize, PartialEq)]
pub enum TagFault {
    #[error("{values} values for {indexes} elapsed indexes")]
    ArityMismatch { values: usize, indexes: usize },
    #[error("elapsed index {0} does not come after the previous one")]
    NonIncreasingIndex(usize),
    #[error("elapsed index {index} is out of range for {len} elapsed times")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("accumulated value {0} overflows")]
    Overflow(usize),
    #[error("value {0} is not numeric")]
    NotNumeric(usize),
    #[error("initial value is not a boolean")]
    NotBoolean,
    #[error("no initial value for {0} elapsed indexes")]
    MissingInitialValue(usize),
}

impl From<serde_json::Error> for HistoryError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value.to_string())
    }
}
