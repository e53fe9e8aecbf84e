//! Row selection for list pages.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Set of selected row identifiers.
///
/// "Select all" only ever covers the identifiers currently visible, never the
/// whole server-side result set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: Deserialize<'de> + Ord"
))]
pub struct Selection<K: Ord = i64> {
    ids: BTreeSet<K>,
}

impl<K: Ord> Default for Selection<K> {
    fn default() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }
}

impl<K: Ord + Clone> Selection<K> {
    pub fn from_ids(ids: impl IntoIterator<Item = K>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Adds an absent id or removes a present one. Returns whether it is now selected.
    pub fn toggle(&mut self, id: K) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Replaces the selection with exactly the visible ids.
    pub fn select_all(&mut self, visible: &[K]) {
        self.ids = visible.iter().cloned().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Keeps only ids that are still visible (`S ∩ V`).
    pub fn prune(&mut self, visible: &[K]) {
        let visible: BTreeSet<&K> = visible.iter().collect();
        self.ids.retain(|id| visible.contains(id));
    }

    pub fn contains(&self, id: K) -> bool {
        self.ids.contains(&id)
    }

    /// True when every visible id is selected and there is at least one.
    pub fn is_all_selected(&self, visible: &[K]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Keeps the `max` smallest ids. Returns whether any id was dropped.
    pub fn truncate(&mut self, max: usize) -> bool {
        if self.ids.len() <= max {
            return false;
        }
        self.ids = std::mem::take(&mut self.ids).into_iter().take(max).collect();
        true
    }
}

/// Action posted by the selection controls of a table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionAction {
    Toggle,
    SelectAll,
    Clear,
}

impl SelectionAction {
    pub fn apply(self, selection: &mut Selection, id: Option<i64>, visible: &[i64]) {
        match self {
            Self::Toggle => {
                if let Some(id) = id {
                    selection.toggle(id);
                }
            }
            Self::SelectAll => {
                if selection.is_all_selected(visible) {
                    selection.clear();
                } else {
                    selection.select_all(visible);
                }
            }
            Self::Clear => selection.clear(),
        }
        selection.prune(visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = Selection::default();
        assert!(selection.toggle(3));
        assert!(selection.contains(3));
        assert!(!selection.toggle(3));
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_covers_only_visible() {
        let mut selection = Selection::from_ids([99]);
        selection.select_all(&[1, 2, 3]);
        assert_eq!(selection, Selection::from_ids([1, 2, 3]));
        assert!(selection.is_all_selected(&[1, 2, 3]));
        assert!(!selection.is_all_selected(&[]));
    }

    #[test]
    fn prune_is_intersection() {
        let cases: [(&[i64], &[i64], &[i64]); 4] = [
            (&[1, 2, 3], &[2, 3, 4], &[2, 3]),
            (&[1, 2], &[5, 6], &[]),
            (&[], &[1], &[]),
            (&[7, 8], &[8, 7, 9], &[7, 8]),
        ];
        for (selected, visible, expected) in cases {
            let mut selection = Selection::from_ids(selected.iter().copied());
            selection.prune(visible);
            assert_eq!(selection, Selection::from_ids(expected.iter().copied()));
        }
    }

    #[test]
    fn truncate_keeps_smallest_ids() {
        let mut selection = Selection::from_ids([9, 3, 7, 1]);
        assert!(!selection.truncate(4));
        assert!(selection.truncate(2));
        assert_eq!(selection, Selection::from_ids([1, 3]));
        assert!(selection.truncate(0));
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_action_toggles_when_everything_is_selected() {
        let visible = [1, 2];
        let mut selection = Selection::default();
        SelectionAction::SelectAll.apply(&mut selection, None, &visible);
        assert_eq!(selection.len(), 2);
        SelectionAction::SelectAll.apply(&mut selection, None, &visible);
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_action_ignores_invisible_ids() {
        let mut selection = Selection::default();
        SelectionAction::Toggle.apply(&mut selection, Some(42), &[1, 2]);
        assert!(selection.is_empty());
        SelectionAction::Toggle.apply(&mut selection, Some(2), &[1, 2]);
        assert!(selection.contains(2));
    }

    #[test]
    fn serializes_for_session_storage() {
        let selection = Selection::from_ids([4, 2]);
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"{"ids":[2,4]}"#);
        let back: Selection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }
}
