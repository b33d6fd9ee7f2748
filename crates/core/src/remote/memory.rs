use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use super::{CatalogRemote, RemoteError};
use crate::models::{CreateGameRequest, CreatedGame, Game, GameId};

/// Thread-safe in-memory catalog honouring the remote contract.
///
/// Records are listed newest first and ids are assigned sequentially,
/// matching what the HTTP endpoint does.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    games: Vec<Game>,
    next_id: GameId,
}

impl MemoryCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-populated with `games`, which are listed as given.
    pub fn with_games(games: Vec<Game>) -> Self {
        let next_id = games.iter().map(|game| game.id).max().unwrap_or(0) + 1;
        Self {
            inner: Arc::new(Mutex::new(Inner { games, next_id })),
        }
    }

    /// Catalog holding the bundled sample games.
    pub fn seeded() -> Self {
        Self::with_games(sample_games())
    }

    /// Snapshot of the current records.
    pub fn snapshot(&self) -> Vec<Game> {
        self.inner.lock().games.clone()
    }
}

impl CatalogRemote for MemoryCatalog {
    async fn list(&self) -> Result<Vec<Game>, RemoteError> {
        Ok(self.snapshot())
    }

    async fn create(&self, request: &CreateGameRequest) -> Result<CreatedGame, RemoteError> {
        let mut inner = self.inner.lock();
        let id = inner.next_id.max(1);
        inner.next_id = id + 1;
        let image = request
            .image_file
            .clone()
            .unwrap_or_else(|| request.image.clone());
        let trailer = Some(request.trailer.clone()).filter(|url| !url.trim().is_empty());
        inner.games.insert(
            0,
            Game {
                id,
                title: request.title.clone(),
                genre: request.genre.clone(),
                rating: request.rating,
                image,
                trailer,
                description: request.description.clone(),
                release_date: request.release_date.clone(),
            },
        );
        info!(id, title = %request.title, "Offline catalog created game");
        Ok(CreatedGame {
            id,
            message: "Game created".to_string(),
        })
    }

    async fn delete(&self, id: GameId) -> Result<(), RemoteError> {
        self.inner.lock().games.retain(|game| game.id != id);
        Ok(())
    }
}

/// The three games shipped with the offline catalog.
pub fn sample_games() -> Vec<Game> {
    const CDN: &str = "https://cdn.poehali.dev/projects/a786bdb9-5d1f-4bd5-8347-dff577f3dd67/files";
    const TRAILER: &str = "https://www.youtube.com/embed/dQw4w9WgXcQ";
    vec![
        Game {
            id: 1,
            title: "Cyber Nexus 2077".to_string(),
            genre: "RPG / Action".to_string(),
            rating: 9.2,
            image: format!("{CDN}/3405c5d9-ba4f-4761-bb10-91060e2f21f8.jpg"),
            trailer: Some(TRAILER.to_string()),
            description: "Futuristic cyberpunk RPG with an open world where your choices decide the fate of the city".to_string(),
            release_date: "2024".to_string(),
        },
        Game {
            id: 2,
            title: "Dragon Legacy".to_string(),
            genre: "RPG / Fantasy".to_string(),
            rating: 9.5,
            image: format!("{CDN}/6b1b4a95-cf38-4a93-a94d-648fe4549706.jpg"),
            trailer: Some(TRAILER.to_string()),
            description: "Epic medieval fantasy adventure with dragons and magic".to_string(),
            release_date: "2024".to_string(),
        },
        Game {
            id: 3,
            title: "Stellar Conflict".to_string(),
            genre: "Shooter / Sci-Fi".to_string(),
            rating: 8.9,
            image: format!("{CDN}/f71b6c35-2eeb-405f-93e7-b55f2399493c.jpg"),
            trailer: Some(TRAILER.to_string()),
            description: "Space shooter with stunning graphics and fast-paced gameplay".to_string(),
            release_date: "2024".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str) -> CreateGameRequest {
        CreateGameRequest {
            title: title.to_string(),
            genre: "Puzzle".to_string(),
            rating: 7.0,
            image: "https://cdn.example.com/p.png".to_string(),
            trailer: String::new(),
            description: "Blocks".to_string(),
            release_date: "2025".to_string(),
            image_file: Some("data:image/png;base64,AAEC".to_string()),
            image_type: Some("png".to_string()),
        }
    }

    #[tokio::test]
    async fn create_assigns_next_id_and_lists_newest_first() -> anyhow::Result<()> {
        let catalog = MemoryCatalog::seeded();
        let created = catalog.create(&request("Tile Drop")).await?;
        assert_eq!(created.id, 4);

        let games = catalog.list().await?;
        assert_eq!(games.len(), 4);
        assert_eq!(games[0].title, "Tile Drop");
        assert_eq!(games[0].image, "data:image/png;base64,AAEC");
        assert!(!games[0].has_trailer());
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_only_the_target() -> anyhow::Result<()> {
        let catalog = MemoryCatalog::seeded();
        catalog.delete(2).await?;
        let ids: Vec<_> = catalog.list().await?.iter().map(|game| game.id).collect();
        assert_eq!(ids, vec![1, 3]);

        catalog.delete(99).await?;
        assert_eq!(catalog.snapshot().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn empty_catalog_starts_ids_at_one() -> anyhow::Result<()> {
        let catalog = MemoryCatalog::new();
        assert_eq!(catalog.create(&request("First")).await?.id, 1);
        assert_eq!(catalog.create(&request("Second")).await?.id, 2);
        Ok(())
    }
}
