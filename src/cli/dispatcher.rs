use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::{
    api::{HistoryQuery, PeApi, http::HttpTransport},
    config::ClientConfig,
    history::{self, History},
    key::{self, Id},
};

use super::{
    error::CliError,
    model::{Cli, CliCommands, KeyCommand},
};

pub const API_TYPE: &str = "pe";

impl Cli {
    pub async fn dispatch(self) -> Result<(), CliError> {
        match self.command {
            CliCommands::Export(args) => {
                let cfg = ClientConfig::load(&self.config)?;
                let api = PeApi::new(HttpTransport::new(&cfg, API_TYPE)?);
                let id = key::decode(&args.id)?;
                let query = HistoryQuery {
                    tags_filter: args.tags_filter,
                    tags: args.tags,
                };
                let history = api
                    .history(&id, &query)
                    .await?
                    .ok_or(CliError::NoHistory(args.id))?;
                write_csv(&history, args.output.as_deref()).await
            }
            CliCommands::Decode(args) => {
                let history = read_payload(&args.input).await?.ok_or_else(|| {
                    CliError::NoHistory(args.input.display().to_string())
                })?;
                write_csv(&history, args.output.as_deref()).await
            }
            CliCommands::Key(args) => {
                println!("{}", convert_key(args.action)?);
                Ok(())
            }
        }
    }
}

async fn read_payload(path: &Path) -> Result<Option<History>, CliError> {
    let text = tokio::fs::read_to_string(path).await?;
    let payload: Value = serde_json::from_str(&text)?;
    Ok(history::decode_payload(payload)?)
}

async fn write_csv(history: &History, output: Option<&Path>) -> Result<(), CliError> {
    let csv = history::history_to_csv(history)?;
    match output {
        Some(path) => {
            tokio::fs::write(path, csv).await?;
            info!(path = %path.display(), rows = history.elapsed_times.len(), "wrote csv");
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn convert_key(cmd: KeyCommand) -> Result<String, CliError> {
    Ok(match cmd {
        KeyCommand::Encode { json } => {
            let id: Id = serde_json::from_str(&json)?;
            key::encode(&id)
        }
        KeyCommand::Decode { key } => serde_json::to_string(&key::decode(&key)?)?,
    })
}
