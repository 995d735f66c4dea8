//! Startup and serving errors.

use thiserror::Error;

use crate::domain::RepositoryError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open room state: {0}")]
    Storage(#[from] RepositoryError),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
