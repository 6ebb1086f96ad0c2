use thiserror::Error;

use crate::{
    api::error::ApiError, config::ConfigError, history::HistoryError, key::error::KeyError,
};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error `{0}`")]
    Config(ConfigError),
    #[error("{0}")]
    Api(ApiError),
    #[error("history unavailable: {0}")]
    History(HistoryError),
    #[error("key error `{0}`")]
    Key(KeyError),
    #[error("json encoding error `{0}`")]
    Json(serde_json::Error),
    #[error("io error `{0}`")]
    Io(std::io::Error),
    #[error("no history for `{0}`")]
    NoHistory(String),
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ApiError> for CliError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::History(e) => Self::History(e),
            e => Self::Api(e),
        }
    }
}

impl From<HistoryError> for CliError {
    fn from(value: HistoryError) -> Self {
        Self::History(value)
    }
}

impl From<KeyError> for CliError {
    fn from(value: KeyError) -> Self {
        Self::Key(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
