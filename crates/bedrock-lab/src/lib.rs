//! The Bedrock demos as a library: configuration, the fixed corpus and the
//! flows printed by the `chat`, `rag` and `summarize` binaries.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod corpus;
mod error;
mod flows;
mod lab;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use flows::{print_rag_comparison, print_summary};
pub use lab::Lab;
