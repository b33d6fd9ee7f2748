//! Remote catalog collaborator.
//!
//! The collaborator owns durable game records. [`CatalogRemote`] captures
//! its contract: list everything, create one record, delete one record.

use std::future::Future;

use thiserror::Error;

use crate::models::{CreateGameRequest, CreatedGame, Game, GameId};

/// HTTP implementation of the catalog contract.
pub mod http;
/// In-memory sample catalog used for offline mode.
pub mod memory;

pub use http::HttpCatalog;
pub use memory::MemoryCatalog;

/// Errors raised while talking to the remote catalog.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never completed (connection, DNS, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("catalog returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the body, or the raw body.
        message: String,
    },
    /// The body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl RemoteError {
    /// Whether retrying the same request later could plausibly succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            Self::Malformed(_) => false,
        }
    }
}

/// Contract of the remote catalog collaborator.
pub trait CatalogRemote: Send + Sync {
    /// Fetch the full list of games.
    fn list(&self) -> impl Future<Output = Result<Vec<Game>, RemoteError>> + Send;

    /// Create a game and return its acknowledgement.
    fn create(
        &self,
        request: &CreateGameRequest,
    ) -> impl Future<Output = Result<CreatedGame, RemoteError>> + Send;

    /// Delete the game with the given identifier.
    fn delete(&self, id: GameId) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
