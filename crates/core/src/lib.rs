#![warn(clippy::all, missing_docs)]

//! Core catalog logic for GameZone.
//!
//! This crate hosts the data models, configuration handling, the remote
//! catalog client, and the session state (store, favorites, filtering,
//! mutations) used by the terminal UI and any future frontends.

pub mod config;
pub mod controller;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod gateway;
pub mod image;
pub mod models;
pub mod remote;
pub mod store;

pub use config::AppConfig;
pub use controller::{CatalogController, DialogState, FailedAction, PendingCreate, Retry};
pub use error::{CatalogError, DraftError, Outcome};
pub use favorites::FavoritesSet;
pub use filter::{EmptyState, Tab};
pub use gateway::{Completed, ConfirmedDelete, MutationGateway};
pub use models::{Game, GameId, NewGameDraft};
pub use remote::{CatalogRemote, HttpCatalog, MemoryCatalog, RemoteError};
pub use store::{GameStore, LoadOutcome, LoadTicket};
