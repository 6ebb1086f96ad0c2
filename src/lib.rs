//! Client side of the PE history resource: identifier keys, history
//! decoding, and tabular export.

pub mod api;
pub mod cli;
pub mod config;
pub mod history;
pub mod key;
