//! Derivation of the visible game list.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{favorites::FavoritesSet, models::Game};

/// Listing partition selected in the tab bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Every game.
    #[default]
    All,
    /// Placeholder partition; currently shows every game.
    New,
    /// Only favorited games.
    Favorites,
}

impl Tab {
    /// Tabs in display order.
    pub const ALL: [Tab; 3] = [Tab::All, Tab::New, Tab::Favorites];

    /// Label shown in the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Tab::All => "All games",
            Tab::New => "New",
            Tab::Favorites => "Favorites",
        }
    }

    /// Next tab, wrapping around.
    pub fn next(self) -> Tab {
        match self {
            Tab::All => Tab::New,
            Tab::New => Tab::Favorites,
            Tab::Favorites => Tab::All,
        }
    }

    /// Position in [`Tab::ALL`].
    pub fn index(self) -> usize {
        match self {
            Tab::All => 0,
            Tab::New => 1,
            Tab::Favorites => 2,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a filtered view came out empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The store itself holds no games.
    NoGames,
    /// Favorites tab with nothing favorited among the loaded games.
    NoFavorites,
    /// A search query excluded every candidate.
    NoMatches,
}

/// Games visible for the given tab and query, in store order.
pub fn visible_games<'a>(
    games: &'a [Game],
    favorites: &FavoritesSet,
    tab: Tab,
    query: &str,
) -> Vec<&'a Game> {
    let needle = query.to_lowercase();
    games
        .iter()
        .filter(|game| in_tab(game, favorites, tab))
        .filter(|game| needle.is_empty() || matches_query(game, &needle))
        .collect()
}

/// Classify an empty result, or `None` if something is visible.
pub fn empty_state(
    games: &[Game],
    favorites: &FavoritesSet,
    tab: Tab,
    query: &str,
) -> Option<EmptyState> {
    if !visible_games(games, favorites, tab, query).is_empty() {
        return None;
    }
    let in_tab_count = games
        .iter()
        .filter(|game| in_tab(game, favorites, tab))
        .count();
    Some(match (tab, in_tab_count) {
        (Tab::Favorites, 0) => EmptyState::NoFavorites,
        (_, 0) => EmptyState::NoGames,
        _ => EmptyState::NoMatches,
    })
}

fn in_tab(game: &Game, favorites: &FavoritesSet, tab: Tab) -> bool {
    match tab {
        Tab::Favorites => favorites.has(game.id),
        Tab::All | Tab::New => true,
    }
}

fn matches_query(game: &Game, needle: &str) -> bool {
    game.title.to_lowercase().contains(needle) || game.genre.to_lowercase().contains(needle)
}
