//! Owned catalog state mutated through named commands.
//!
//! Network work is split into a synchronous `begin_*` step that updates
//! state and hands out the work to perform, the asynchronous gateway
//! call, and a synchronous `finish_*` step that applies the result. The
//! terminal frontend runs the middle step on a spawned task; the
//! `async` convenience commands run all three in sequence.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    error::{CatalogError, Outcome},
    favorites::FavoritesSet,
    filter::{self, EmptyState, Tab},
    gateway::{validate_draft, Completed, ConfirmedDelete, MutationGateway},
    models::{Game, GameId, NewGameDraft},
    remote::CatalogRemote,
    store::{GameStore, LoadOutcome},
};

/// State of the authoring dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogState {
    /// Not shown.
    #[default]
    Closed,
    /// Shown and editable.
    Open,
    /// A create request is in flight; the draft is frozen.
    Submitting,
}

/// Command that failed last and can be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedAction {
    /// Reloading the catalog.
    Reload,
    /// Creating the draft currently held in the dialog.
    Create,
    /// Deleting the given game.
    Delete(GameId),
}

/// A validated draft ready to be sent through the gateway.
#[derive(Debug, Clone)]
pub struct PendingCreate {
    draft: NewGameDraft,
}

impl PendingCreate {
    /// Draft snapshot taken when the submission started.
    pub fn draft(&self) -> &NewGameDraft {
        &self.draft
    }
}

/// Work to perform for a retry.
#[derive(Debug, Clone)]
pub enum Retry {
    /// Reload the catalog.
    Reload,
    /// Re-submit the preserved draft.
    Create(PendingCreate),
    /// Re-issue a confirmed delete.
    Delete(ConfirmedDelete),
}

/// Catalog session: store, favorites, view settings and dialogs.
#[derive(Debug)]
pub struct CatalogController<R> {
    gateway: MutationGateway<R>,
    favorites: FavoritesSet,
    tab: Tab,
    query: String,
    dialog: DialogState,
    draft: NewGameDraft,
    pending_delete: Option<GameId>,
    notice: Option<Outcome>,
    last_failed: Option<FailedAction>,
}

impl<R: CatalogRemote> CatalogController<R> {
    /// Fresh session backed by `remote` with an empty store.
    pub fn new(remote: R) -> Self {
        Self::with_store(remote, GameStore::new())
    }

    /// Session backed by `remote` sharing an existing store.
    pub fn with_store(remote: R, store: GameStore) -> Self {
        Self {
            gateway: MutationGateway::new(remote, store),
            favorites: FavoritesSet::new(),
            tab: Tab::default(),
            query: String::new(),
            dialog: DialogState::Closed,
            draft: NewGameDraft::default(),
            pending_delete: None,
            notice: None,
            last_failed: None,
        }
    }

    /// Gateway used for mutations and reloads.
    pub fn gateway(&self) -> &MutationGateway<R> {
        &self.gateway
    }

    /// Shared store.
    pub fn store(&self) -> &GameStore {
        self.gateway.store()
    }

    /// Full store snapshot.
    pub fn games(&self) -> Arc<Vec<Game>> {
        self.store().games()
    }

    /// Games visible under the current tab and query.
    pub fn visible(&self) -> Vec<Game> {
        let games = self.games();
        filter::visible_games(&games, &self.favorites, self.tab, &self.query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Why the visible list is empty, if it is.
    pub fn empty_state(&self) -> Option<EmptyState> {
        let games = self.games();
        filter::empty_state(&games, &self.favorites, self.tab, &self.query)
    }

    /// Session favorites.
    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    /// Whether `id` is favorited.
    pub fn is_favorite(&self, id: GameId) -> bool {
        self.favorites.has(id)
    }

    /// Active tab.
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Current search text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Authoring dialog state.
    pub fn dialog(&self) -> DialogState {
        self.dialog
    }

    /// Draft held by the authoring dialog.
    pub fn draft(&self) -> &NewGameDraft {
        &self.draft
    }

    /// Game awaiting delete confirmation.
    pub fn pending_delete(&self) -> Option<GameId> {
        self.pending_delete
    }

    /// Outcome of the most recent command worth reporting.
    pub fn notice(&self) -> Option<&Outcome> {
        self.notice.as_ref()
    }

    /// Command that failed last, if any.
    pub fn last_failed(&self) -> Option<FailedAction> {
        self.last_failed
    }

    /// Whether the latest reload is still in flight.
    pub fn is_loading(&self) -> bool {
        self.store().is_loading()
    }

    /// Toggle a favorite. Returns the new membership.
    pub fn toggle_favorite(&mut self, id: GameId) -> bool {
        self.favorites.toggle(id)
    }

    /// Switch the listing tab.
    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Replace the search text.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Dismiss the current notice.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Show the authoring dialog. No-op unless it is closed.
    pub fn open_dialog(&mut self) {
        if self.dialog == DialogState::Closed {
            self.dialog = DialogState::Open;
        }
    }

    /// Edit the draft. Ignored unless the dialog is open.
    pub fn update_draft(&mut self, edit: impl FnOnce(&mut NewGameDraft)) -> bool {
        if self.dialog != DialogState::Open {
            return false;
        }
        edit(&mut self.draft);
        true
    }

    /// Close the dialog and discard the draft.
    pub fn cancel_dialog(&mut self) {
        if self.dialog != DialogState::Open {
            return;
        }
        self.dialog = DialogState::Closed;
        self.draft = NewGameDraft::default();
        if self.last_failed == Some(FailedAction::Create) {
            self.last_failed = None;
        }
    }

    /// Validate the draft and move the dialog to `Submitting`.
    pub fn begin_submit(&mut self) -> Result<PendingCreate, Outcome> {
        if self.dialog != DialogState::Open {
            let err = CatalogError::InvalidState("the add dialog is not open");
            return Err(self.report(&err));
        }
        if let Err(err) = validate_draft(&self.draft) {
            warn!(%err, "Draft rejected");
            return Err(self.report(&CatalogError::from(err)));
        }
        self.dialog = DialogState::Submitting;
        Ok(PendingCreate {
            draft: self.draft.clone(),
        })
    }

    /// Apply the result of a create started with [`Self::begin_submit`].
    pub fn finish_submit(&mut self, result: Result<Completed, CatalogError>) -> Outcome {
        match result {
            Ok(completed) => {
                self.dialog = DialogState::Closed;
                self.draft = NewGameDraft::default();
                if self.last_failed == Some(FailedAction::Create) {
                    self.last_failed = None;
                }
                self.after_mutation(format!("Created game #{}", completed.id), completed.reload)
            }
            Err(err) => {
                self.dialog = DialogState::Open;
                self.last_failed = Some(FailedAction::Create);
                self.report(&err)
            }
        }
    }

    /// Submit the draft and wait for the create and reload to finish.
    pub async fn submit_draft(&mut self) -> Outcome {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };
        let result = self.gateway.create(pending.draft()).await;
        self.finish_submit(result)
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: GameId) -> bool {
        if self.store().get(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    /// Abandon a pending delete.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Confirm the pending delete, producing the token the gateway needs.
    pub fn confirm_delete(&mut self) -> Option<ConfirmedDelete> {
        self.pending_delete.take().map(ConfirmedDelete::new)
    }

    /// Apply the result of deleting `id`.
    pub fn finish_delete(&mut self, id: GameId, result: Result<Completed, CatalogError>) -> Outcome {
        match result {
            Ok(completed) => {
                if self.last_failed == Some(FailedAction::Delete(id)) {
                    self.last_failed = None;
                }
                self.after_mutation(format!("Deleted game #{id}"), completed.reload)
            }
            Err(err) => {
                self.last_failed = Some(FailedAction::Delete(id));
                self.report(&err)
            }
        }
    }

    /// Confirm the pending delete and wait for it and the reload to finish.
    pub async fn confirm_and_delete(&mut self) -> Option<Outcome> {
        let confirmed = self.confirm_delete()?;
        let result = self.gateway.delete(confirmed).await;
        Some(self.finish_delete(confirmed.id(), result))
    }

    /// Apply the result of a reload.
    pub fn finish_reload(&mut self, outcome: LoadOutcome) -> Outcome {
        match outcome {
            LoadOutcome::Committed(total) => {
                if self.last_failed == Some(FailedAction::Reload) {
                    self.last_failed = None;
                }
                let outcome = Outcome::success(format!("Loaded {total} games"));
                self.notice = Some(outcome.clone());
                outcome
            }
            LoadOutcome::Stale => Outcome::success("Superseded by a newer reload"),
            LoadOutcome::Failed(err) => {
                self.last_failed = Some(FailedAction::Reload);
                self.report(&CatalogError::from(err))
            }
        }
    }

    /// Reload the catalog and wait for the result.
    pub async fn reload(&mut self) -> Outcome {
        let outcome = self.gateway.reload().await;
        self.finish_reload(outcome)
    }

    /// Prepare a retry of the last failed command.
    pub fn take_retry(&mut self) -> Option<Retry> {
        match self.last_failed? {
            FailedAction::Reload => Some(Retry::Reload),
            FailedAction::Create => self.begin_submit().ok().map(Retry::Create),
            FailedAction::Delete(id) => Some(Retry::Delete(ConfirmedDelete::new(id))),
        }
    }

    /// Retry the last failed command and wait for it to finish.
    pub async fn retry_last_failed(&mut self) -> Option<Outcome> {
        let outcome = match self.take_retry()? {
            Retry::Reload => self.reload().await,
            Retry::Create(pending) => {
                let result = self.gateway.create(pending.draft()).await;
                self.finish_submit(result)
            }
            Retry::Delete(confirmed) => {
                let result = self.gateway.delete(confirmed).await;
                self.finish_delete(confirmed.id(), result)
            }
        };
        Some(outcome)
    }

    fn after_mutation(&mut self, message: String, reload: LoadOutcome) -> Outcome {
        info!(%message, "Mutation accepted");
        match reload {
            LoadOutcome::Failed(err) => {
                self.last_failed = Some(FailedAction::Reload);
                self.report(&CatalogError::from(err))
            }
            LoadOutcome::Committed(_) | LoadOutcome::Stale => {
                let outcome = Outcome::success(message);
                self.notice = Some(outcome.clone());
                outcome
            }
        }
    }

    fn report(&mut self, err: &CatalogError) -> Outcome {
        let outcome = Outcome::from(err);
        self.notice = Some(outcome.clone());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::{valid_draft, RecordingCatalog};

    async fn loaded() -> (CatalogController<RecordingCatalog>, RecordingCatalog) {
        let remote = RecordingCatalog::seeded();
        let mut controller = CatalogController::new(remote.clone());
        assert!(controller.reload().await.is_success());
        (controller, remote)
    }

    fn ids(games: &[Game]) -> Vec<GameId> {
        games.iter().map(|game| game.id).collect()
    }

    #[tokio::test]
    async fn favorites_tab_and_query_drive_visible_list() {
        let (mut controller, _) = loaded().await;
        assert_eq!(ids(&controller.visible()), vec![1, 2, 3]);

        controller.set_tab(Tab::Favorites);
        assert!(controller.visible().is_empty());
        assert_eq!(controller.empty_state(), Some(EmptyState::NoFavorites));

        assert!(controller.toggle_favorite(2));
        assert!(controller.toggle_favorite(3));
        assert_eq!(ids(&controller.visible()), vec![2, 3]);

        controller.set_query("rpg");
        assert_eq!(ids(&controller.visible()), vec![2]);

        controller.set_query("racing");
        assert_eq!(controller.empty_state(), Some(EmptyState::NoMatches));
    }

    #[tokio::test]
    async fn successful_create_closes_dialog_and_reloads_once() {
        let (mut controller, remote) = loaded().await;
        let lists_before = remote.list_calls();

        controller.open_dialog();
        assert!(controller.update_draft(|draft| *draft = valid_draft()));
        let outcome = controller.submit_draft().await;

        assert!(outcome.is_success(), "{outcome:?}");
        assert_eq!(remote.list_calls(), lists_before + 1);
        assert_eq!(controller.dialog(), DialogState::Closed);
        assert_eq!(controller.draft(), &NewGameDraft::default());
        assert_eq!(controller.visible()[0].title, "Tile Drop");
    }

    #[tokio::test]
    async fn invalid_draft_stays_open_without_network() {
        let (mut controller, remote) = loaded().await;
        controller.open_dialog();
        controller.update_draft(|draft| {
            *draft = valid_draft();
            draft.title.clear();
        });

        let outcome = controller.submit_draft().await;
        assert!(outcome.is_recoverable());
        assert_eq!(remote.mutation_calls(), 0);
        assert_eq!(controller.dialog(), DialogState::Open);
        assert_eq!(controller.last_failed(), None);
    }

    #[tokio::test]
    async fn submit_requires_open_dialog() {
        let (mut controller, remote) = loaded().await;
        let outcome = controller.submit_draft().await;
        assert!(!outcome.is_success());
        assert_eq!(remote.mutation_calls(), 0);
        assert!(!controller.update_draft(|draft| draft.title.push('x')));
    }

    #[tokio::test]
    async fn failed_create_preserves_draft_and_can_be_retried() {
        let (mut controller, remote) = loaded().await;
        remote.fail_mutations_with(Some(503));

        controller.open_dialog();
        controller.update_draft(|draft| *draft = valid_draft());
        let outcome = controller.submit_draft().await;

        assert!(outcome.is_recoverable());
        assert_eq!(controller.dialog(), DialogState::Open);
        assert_eq!(controller.draft(), &valid_draft());
        assert_eq!(controller.last_failed(), Some(FailedAction::Create));

        remote.fail_mutations_with(None);
        let retried = controller.retry_last_failed().await.expect("retry available");
        assert!(retried.is_success());
        assert_eq!(controller.dialog(), DialogState::Closed);
        assert_eq!(controller.last_failed(), None);
        assert_eq!(controller.games().len(), 4);
    }

    #[tokio::test]
    async fn cancel_discards_draft_and_pending_retry() {
        let (mut controller, remote) = loaded().await;
        remote.fail_mutations_with(Some(503));
        controller.open_dialog();
        controller.update_draft(|draft| *draft = valid_draft());
        controller.submit_draft().await;

        controller.cancel_dialog();
        assert_eq!(controller.dialog(), DialogState::Closed);
        assert_eq!(controller.draft(), &NewGameDraft::default());
        assert!(controller.retry_last_failed().await.is_none());
    }

    #[tokio::test]
    async fn delete_waits_for_confirmation() {
        let (mut controller, remote) = loaded().await;
        assert!(!controller.request_delete(42));

        assert!(controller.request_delete(1));
        controller.cancel_delete();
        assert!(controller.confirm_and_delete().await.is_none());
        assert_eq!(remote.mutation_calls(), 0);

        controller.request_delete(1);
        let outcome = controller.confirm_and_delete().await.expect("confirmed");
        assert!(outcome.is_success());
        assert_eq!(ids(&controller.visible()), vec![2, 3]);
    }

    #[tokio::test]
    async fn failed_delete_keeps_item_until_successful_reload() {
        let (mut controller, remote) = loaded().await;
        remote.fail_mutations_with(Some(500));

        controller.request_delete(3);
        let outcome = controller.confirm_and_delete().await.expect("confirmed");
        assert!(outcome.is_recoverable());
        assert!(controller.games().iter().any(|game| game.id == 3));
        assert_eq!(controller.last_failed(), Some(FailedAction::Delete(3)));

        remote.fail_mutations_with(None);
        let retried = controller.retry_last_failed().await.expect("retry available");
        assert!(retried.is_success());
        assert!(controller.games().iter().all(|game| game.id != 3));
    }

    #[tokio::test]
    async fn failed_reload_keeps_list_and_reports() {
        let (mut controller, remote) = loaded().await;
        remote.fail_lists_with(Some(502));

        let outcome = controller.reload().await;
        assert!(outcome.is_recoverable());
        assert_eq!(controller.games().len(), 3);
        assert!(!controller.is_loading());
        assert_eq!(controller.notice(), Some(&outcome));

        remote.fail_lists_with(None);
        let retried = controller.retry_last_failed().await.expect("retry available");
        assert!(retried.is_success());
        assert_eq!(controller.last_failed(), None);
    }

    #[tokio::test]
    async fn rejected_request_is_fatal() {
        let (mut controller, remote) = loaded().await;
        remote.fail_mutations_with(Some(400));
        controller.request_delete(2);
        let outcome = controller.confirm_and_delete().await.expect("confirmed");
        assert!(matches!(outcome, Outcome::Fatal { .. }));
    }
}
