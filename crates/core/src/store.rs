//! Authoritative mirror of the remote game list.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info};

use crate::{
    models::{Game, GameId},
    remote::{CatalogRemote, RemoteError},
};

/// Handle for one issued reload. Only the most recent ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    /// Generation number of this request.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of completing a reload.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The fetched list replaced the store contents.
    Committed(usize),
    /// A newer reload was issued meanwhile; the result was discarded.
    Stale,
    /// The fetch failed; the store kept its previous contents.
    Failed(RemoteError),
}

impl LoadOutcome {
    /// True unless the fetch failed.
    pub fn is_ok(&self) -> bool {
        !matches!(self, LoadOutcome::Failed(_))
    }
}

/// Thread-safe store shared between the UI loop and background reloads.
#[derive(Debug, Clone, Default)]
pub struct GameStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    games: Arc<Vec<Game>>,
    loading: bool,
    latest_generation: u64,
    committed_generation: u64,
}

impl GameStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current list. Never observes a partial update.
    pub fn games(&self) -> Arc<Vec<Game>> {
        Arc::clone(&self.inner.read().games)
    }

    /// Look up a game by id.
    pub fn get(&self, id: GameId) -> Option<Game> {
        self.inner
            .read()
            .games
            .iter()
            .find(|game| game.id == id)
            .cloned()
    }

    /// Whether the latest issued reload is still in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.read().loading
    }

    /// Generation of the list currently held, 0 before the first commit.
    pub fn committed_generation(&self) -> u64 {
        self.inner.read().committed_generation
    }

    /// Issue a new reload ticket and raise the loading flag.
    pub fn begin_load(&self) -> LoadTicket {
        let mut inner = self.inner.write();
        inner.latest_generation += 1;
        inner.loading = true;
        LoadTicket {
            generation: inner.latest_generation,
        }
    }

    /// Apply the result of the fetch started with `ticket`.
    pub fn complete_load(
        &self,
        ticket: LoadTicket,
        result: Result<Vec<Game>, RemoteError>,
    ) -> LoadOutcome {
        let mut inner = self.inner.write();
        if ticket.generation != inner.latest_generation {
            debug!(
                generation = ticket.generation,
                latest = inner.latest_generation,
                "Discarding stale catalog response"
            );
            return LoadOutcome::Stale;
        }

        inner.loading = false;
        match result {
            Ok(games) => {
                let total = games.len();
                inner.games = Arc::new(games);
                inner.committed_generation = ticket.generation;
                info!(total, generation = ticket.generation, "Games reloaded");
                LoadOutcome::Committed(total)
            }
            Err(err) => {
                error!(%err, generation = ticket.generation, "Catalog reload failed");
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Fetch the full list from `remote` and replace the contents.
    pub async fn load<R: CatalogRemote>(&self, remote: &R) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = remote.list().await;
        self.complete_load(ticket, result)
    }
}
