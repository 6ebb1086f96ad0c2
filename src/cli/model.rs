use std::path::PathBuf;

use clap_derive::{Args, Parser, Subcommand};

pub const DEFAULT_CONFIG_PATH: &str = "./pe.ron";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// RON client config, `PE_*` env vars override it
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
    #[command(subcommand)]
    pub command: CliCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommands {
    /// Fetch a history and write it as CSV
    Export(ExportArgs),
    /// Decode a saved history payload and write it as CSV
    Decode(DecodeArgs),
    /// Convert between identifiers and their key strings
    Key(KeyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// key string, ex. `G1@12`
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub tags_filter: Option<String>,
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
    /// stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// JSON payload as returned by the `history` resource
    pub input: PathBuf,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub action: KeyCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum KeyCommand {
    /// JSON identifier -> key string
    Encode { json: String },
    /// key string -> JSON identifier
    Decode { key: String },
}
