//! Create and delete requests against the remote catalog.
//!
//! The gateway never patches the local list. Every accepted mutation is
//! followed by exactly one full reload of the [`GameStore`].

use tracing::{error, info};

use crate::{
    error::{CatalogError, DraftError},
    image::{image_subtype, InlineImage},
    models::{CreateGameRequest, GameId, NewGameDraft},
    remote::CatalogRemote,
    store::{GameStore, LoadOutcome},
};

/// Proof that the user confirmed deleting a game.
///
/// Only the controller's confirm step hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: GameId,
}

impl ConfirmedDelete {
    pub(crate) fn new(id: GameId) -> Self {
        Self { id }
    }

    /// Game to delete.
    pub fn id(&self) -> GameId {
        self.id
    }
}

/// An accepted mutation and the reload it triggered.
#[derive(Debug)]
pub struct Completed {
    /// Created or deleted game.
    pub id: GameId,
    /// Result of the follow-up reload.
    pub reload: LoadOutcome,
}

/// Issues mutations and keeps the store in sync afterwards.
#[derive(Debug, Clone)]
pub struct MutationGateway<R> {
    remote: R,
    store: GameStore,
}

impl<R: CatalogRemote> MutationGateway<R> {
    /// Gateway writing through `remote` and reloading `store`.
    pub fn new(remote: R, store: GameStore) -> Self {
        Self { remote, store }
    }

    /// Remote collaborator.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Store refreshed after each mutation.
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Reload the store from the remote.
    pub async fn reload(&self) -> LoadOutcome {
        self.store.load(&self.remote).await
    }

    /// Validate, encode and submit `draft`, then reload.
    pub async fn create(&self, draft: &NewGameDraft) -> Result<Completed, CatalogError> {
        validate_draft(draft)?;

        let inline = match &draft.image_file {
            Some(path) => Some(InlineImage::load(path).await?),
            None => None,
        };
        let request = build_request(draft, inline);

        let created = self.remote.create(&request).await.map_err(|err| {
            error!(%err, title = %request.title, "Create request failed");
            CatalogError::from(err)
        })?;
        info!(id = created.id, title = %request.title, "Game created");

        let reload = self.reload().await;
        Ok(Completed {
            id: created.id,
            reload,
        })
    }

    /// Delete a confirmed game, then reload.
    pub async fn delete(&self, confirmed: ConfirmedDelete) -> Result<Completed, CatalogError> {
        let id = confirmed.id();
        self.remote.delete(id).await.map_err(|err| {
            error!(%err, id, "Delete request failed");
            CatalogError::from(err)
        })?;
        info!(id, "Game deleted");

        let reload = self.reload().await;
        Ok(Completed { id, reload })
    }
}

/// Check that `draft` can be submitted.
pub fn validate_draft(draft: &NewGameDraft) -> Result<(), DraftError> {
    if draft.title.trim().is_empty() {
        return Err(DraftError::MissingTitle);
    }
    if draft.genre.trim().is_empty() {
        return Err(DraftError::MissingGenre);
    }
    if draft.description.trim().is_empty() {
        return Err(DraftError::MissingDescription);
    }
    if !draft.has_image() {
        return Err(DraftError::MissingImage);
    }
    if !(0.0..=10.0).contains(&draft.rating) {
        return Err(DraftError::RatingOutOfRange(draft.rating));
    }
    if let Some(path) = &draft.image_file {
        if image_subtype(path).is_err() {
            return Err(DraftError::UnsupportedImage(path.clone()));
        }
    }
    Ok(())
}

fn build_request(draft: &NewGameDraft, inline: Option<InlineImage>) -> CreateGameRequest {
    let (image_file, image_type) = match inline {
        Some(image) => (Some(image.data_url), Some(image.subtype)),
        None => (None, None),
    };
    CreateGameRequest {
        title: draft.title.trim().to_string(),
        genre: draft.genre.trim().to_string(),
        rating: draft.rating,
        image: draft.image.trim().to_string(),
        trailer: draft.trailer.trim().to_string(),
        description: draft.description.trim().to_string(),
        release_date: draft.release_date.trim().to_string(),
        image_file,
        image_type,
    }
}
