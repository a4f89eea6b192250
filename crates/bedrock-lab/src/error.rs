use std::io;

use bedrock_lab_core::{ClientError, rag};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that abort a demo.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Rag(#[from] rag::Error),
    #[error("error invoking model: {0}")]
    Model(ClientError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<ClientError> for Error {
    #[inline]
    fn from(err: ClientError) -> Self {
        Error::Model(err)
    }
}
