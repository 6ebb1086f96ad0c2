use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize, PartialEq, Eq)]
pub enum KeyError {
    #[error("segment {0} of key `{1}` is not an integer: `{2}`")]
    NotAnInteger(usize, String, String),
}
