pub mod dispatcher;
pub mod error;
pub mod model;

pub use error::CliError;
pub use model::Cli;
