//! Boundary to the remote PE service.
//!
//! The service is only ever asked for raw JSON ([`Transport::fetch`]) and
//! handed raw JSON ([`Transport::post`]). Everything with structure lives
//! in [`crate::history`] and [`crate::key`].

pub mod error;
pub mod http;

use std::future::Future;

use error::ApiError;
use serde::Serialize;
use serde_json::Value;
use tracing::{Instrument, Level, info, span};

use crate::{
    history::{self, History},
    key::{self, Id},
};

/// Query parameters, keys may repeat
pub type Query = [(&'static str, String)];

pub trait Transport {
    fn fetch(
        &self,
        path: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Value, ApiError>> + Send;

    fn post(
        &self,
        path: &str,
        query: &Query,
        body: &Value,
    ) -> impl Future<Output = Result<Value, ApiError>> + Send;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub tags_filter: Option<String>,
    /// restrict to these tag names, all tags when empty
    pub tags: Vec<String>,
}

impl HistoryQuery {
    fn params(&self, id: &Id) -> Vec<(&'static str, String)> {
        let mut params = vec![("id", key::id_to_string(Some(id)))];
        if let Some(filter) = self.tags_filter.as_ref().filter(|f| !f.is_empty()) {
            params.push(("tagsFilter", filter.clone()));
        }
        if !self.tags.is_empty() {
            params.push(("tags", self.tags.join(",")));
        }
        params
    }
}

pub struct PeApi<T> {
    transport: T,
}

impl<T: Transport> PeApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetches and decodes the history of a job (or program, step, ...).
    /// `None` when the service has no history for `id`.
    pub async fn history(&self, id: &Id, query: &HistoryQuery) -> Result<Option<History>, ApiError> {
        let span = span!(Level::INFO, "history", id = %id);
        async {
            let payload = self.transport.fetch("history", &query.params(id)).await?;
            let history = history::decode_payload(payload)?;
            match &history {
                Some(h) => info!(rows = h.elapsed_times.len(), tags = h.tags.len(), "fetched"),
                None => info!("no history"),
            }
            Ok::<_, ApiError>(history)
        }
        .instrument(span)
        .await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body)?;
        self.transport.post(path, &[], &body).await
    }
}
