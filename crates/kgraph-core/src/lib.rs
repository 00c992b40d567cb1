//! kgraph core: configuration, data paths and the shared error type.

pub mod config;
pub mod error;

pub use config::{AppConfig, DataPaths};
pub use error::{Error, Result};
