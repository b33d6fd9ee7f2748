//! Shared domain models.

use chrono::{Datelike, Local};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Identifier assigned to a game by the remote catalog.
pub type GameId = i64;

/// A catalog entry as served by the remote endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Remote-assigned identity key.
    pub id: GameId,
    /// Display title.
    pub title: String,
    /// Free-form genre label, e.g. `RPG / Action`.
    #[serde(deserialize_with = "null_as_default")]
    pub genre: String,
    /// Score on a 0–10 scale.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    /// Cover image URL (remote or `data:` URL).
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    /// Trailer URL. The endpoint sends an empty string when there is none.
    #[serde(default)]
    pub trailer: Option<String>,
    /// Longer description shown in the details pane.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Release date as entered by the author (usually a year).
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Game {
    /// Trailer URL, if the game has a usable one.
    pub fn trailer_url(&self) -> Option<&str> {
        self.trailer
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Whether the trailer action should be offered for this game.
    pub fn has_trailer(&self) -> bool {
        self.trailer_url().is_some()
    }

    /// Returns a user-facing label combining title and genre.
    pub fn display_name(&self) -> String {
        if self.genre.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} · {}", self.title, self.genre)
        }
    }
}

/// Unsaved record being authored in the add dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGameDraft {
    /// Required title.
    pub title: String,
    /// Required genre label.
    pub genre: String,
    /// Score, bounded to 0–10 at submission.
    pub rating: f64,
    /// Image URL typed by the author. Ignored when `image_file` is set.
    pub image: String,
    /// Optional trailer URL.
    pub trailer: String,
    /// Required description.
    pub description: String,
    /// Release date text.
    pub release_date: String,
    /// Local image to upload inline instead of a URL.
    pub image_file: Option<PathBuf>,
}

impl Default for NewGameDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            genre: String::new(),
            rating: 0.0,
            image: String::new(),
            trailer: String::new(),
            description: String::new(),
            release_date: Local::now().year().to_string(),
            image_file: None,
        }
    }
}

impl NewGameDraft {
    /// True when either an image file or an image URL has been provided.
    pub fn has_image(&self) -> bool {
        self.image_file.is_some() || !self.image.trim().is_empty()
    }
}

/// JSON body sent to the endpoint when creating a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct CreateGameRequest {
    pub title: String,
    pub genre: String,
    pub rating: f64,
    pub image: String,
    pub trailer: String,
    pub description: String,
    pub release_date: String,
    /// Inline `data:` URL of the uploaded image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_file: Option<String>,
    /// Image subtype (`png`, `jpeg`, ...) accompanying `image_file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
}

/// Acknowledgement returned by the endpoint after a successful create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedGame {
    /// Identifier of the new record.
    pub id: GameId,
    /// Human-readable confirmation from the endpoint.
    #[serde(default)]
    pub message: String,
}
