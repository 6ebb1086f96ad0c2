use thiserror::Error;

use crate::history::HistoryError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("http error `{0}`")]
    Http(reqwest::Error),
    #[error("token is not a valid header value")]
    InvalidToken,
    #[error("json encoding error `{0}`")]
    Json(serde_json::Error),
    #[error("history unavailable: {0}")]
    History(HistoryError),
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ApiError {
    fn from(_: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidToken
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<HistoryError> for ApiError {
    fn from(value: HistoryError) -> Self {
        Self::History(value)
    }
}
