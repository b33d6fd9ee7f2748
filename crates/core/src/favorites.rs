//! Session-scoped favorites.

use std::collections::BTreeSet;

use crate::models::GameId;

/// Set of favorited game ids. Lives only as long as the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: BTreeSet<GameId>,
}

impl FavoritesSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present. Returns the new membership.
    pub fn toggle(&mut self, id: GameId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Membership query.
    pub fn has(&self, id: GameId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of favorited ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing has been favorited.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Favorited ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = GameId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<GameId> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = GameId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_original() {
        let mut favorites: FavoritesSet = [1, 5].into_iter().collect();
        let original = favorites.clone();

        for id in [1, 2, 5, 9] {
            favorites.toggle(id);
            favorites.toggle(id);
            assert_eq!(favorites, original);
        }
    }

    #[test]
    fn toggle_reports_membership() {
        let mut favorites = FavoritesSet::new();
        assert!(favorites.toggle(3));
        assert!(favorites.has(3));
        assert!(!favorites.toggle(3));
        assert!(!favorites.has(3));
        assert!(favorites.is_empty());
    }

    #[test]
    fn iterates_in_id_order() {
        let favorites: FavoritesSet = [9, 2, 4].into_iter().collect();
        assert_eq!(favorites.iter().collect::<Vec<_>>(), vec![2, 4, 9]);
        assert_eq!(favorites.len(), 3);
    }
}
