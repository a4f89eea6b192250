//! An abstraction layer for the foundation models used by the demos.
//!
//! This crate establishes an unified protocol for text generation and
//! text embedding, so that the flows can be driven by a managed service
//! in production and by scripted fakes in tests, without modifying the
//! core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod embedding;
mod error;
mod provider;
mod request;
mod response;

pub use embedding::*;
pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
