//! Grouped accordion roster with infinite scroll.
//!
//! The full list lives in memory; a cursor says how many filtered items are
//! rendered. Scrolling near the bottom advances the cursor by one batch, a
//! search change re-filters and rewinds it.

use std::collections::BTreeSet;

use crate::shared::list_utils::Searchable;

/// Scroll position is within `threshold` pixels of the end.
pub fn is_near_bottom(scroll_top: f64, client_height: f64, scroll_height: f64, threshold: f64) -> bool {
    scroll_top + client_height >= scroll_height - threshold
}

pub trait RosterItem: Searchable {
    fn key(&self) -> i64;
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteRoster<T> {
    items: Vec<T>,
    search: String,
    rendered: usize,
    batch_size: usize,
    open: BTreeSet<i64>,
}

impl<T: RosterItem> InfiniteRoster<T> {
    pub fn new(batch_size: usize) -> Self {
        Self {
            items: Vec::new(),
            search: String::new(),
            rendered: 0,
            batch_size: batch_size.max(1),
            open: BTreeSet::new(),
        }
    }

    /// Replaces the list; cursor rewinds to the first batch, accordions close.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.rendered = self.batch_size;
        self.open.clear();
    }

    pub fn clear(&mut self) {
        self.set_items(Vec::new());
    }

    pub fn set_search(&mut self, term: &str) {
        if self.search == term {
            return;
        }
        self.search = term.to_string();
        self.rendered = self.batch_size;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn filtered(&self) -> Vec<&T> {
        let filter = self.search.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| filter.is_empty() || item.matches_filter(&filter))
            .collect()
    }

    /// Items currently rendered.
    pub fn visible(&self) -> Vec<&T> {
        let mut filtered = self.filtered();
        filtered.truncate(self.rendered);
        filtered
    }

    pub fn has_more(&self) -> bool {
        self.filtered().len() > self.rendered
    }

    /// Appends the next batch. Returns the newly rendered keys.
    pub fn load_more(&mut self) -> Vec<i64> {
        if !self.has_more() {
            return Vec::new();
        }
        let start = self.rendered;
        self.rendered += self.batch_size;
        self.filtered()
            .into_iter()
            .skip(start)
            .take(self.batch_size)
            .map(|item| item.key())
            .collect()
    }

    /// Scroll handler: loads the next batch when near the end.
    pub fn on_scroll(&mut self, scroll_top: f64, client_height: f64, scroll_height: f64, threshold: f64) -> Vec<i64> {
        if is_near_bottom(scroll_top, client_height, scroll_height, threshold) {
            self.load_more()
        } else {
            Vec::new()
        }
    }

    pub fn toggle(&mut self, key: i64) {
        if !self.open.remove(&key) {
            self.open.insert(key);
        }
    }

    pub fn is_open(&self, key: i64) -> bool {
        self.open.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Group(i64, String);

    impl Searchable for Group {
        fn matches_filter(&self, filter_lower: &str) -> bool {
            self.1.to_lowercase().contains(filter_lower)
        }
    }

    impl RosterItem for Group {
        fn key(&self) -> i64 {
            self.0
        }
    }

    fn roster(n: i64) -> InfiniteRoster<Group> {
        let mut r = InfiniteRoster::new(50);
        r.set_items((1..=n).map(|i| Group(i, format!("ИТ-{}", i))).collect());
        r
    }

    #[test]
    fn test_batches_of_fifty() {
        let mut r = roster(120);
        assert_eq!(r.visible().len(), 50);

        let added = r.on_scroll(950.0, 400.0, 1400.0, 50.0);
        assert_eq!(added.len(), 50);
        assert_eq!(added[0], 51);
        assert_eq!(r.visible().len(), 100);

        assert!(r.on_scroll(0.0, 400.0, 2800.0, 50.0).is_empty());
        assert_eq!(r.load_more().len(), 20);
        assert!(!r.has_more());
        assert!(r.load_more().is_empty());
    }

    #[test]
    fn test_search_resets_cursor() {
        let mut r = roster(120);
        r.load_more();
        r.set_search("ИТ-1");
        // ИТ-1, ИТ-10..19, ИТ-100..120
        assert_eq!(r.filtered().len(), 32);
        assert_eq!(r.visible().len(), 32);
        assert!(!r.has_more());

        r.set_search("");
        assert_eq!(r.visible().len(), 50);
    }

    #[test]
    fn test_accordion_toggle() {
        let mut r = roster(3);
        r.toggle(2);
        assert!(r.is_open(2));
        r.toggle(2);
        assert!(!r.is_open(2));
    }

    #[test]
    fn test_near_bottom_threshold() {
        assert!(is_near_bottom(550.0, 400.0, 1000.0, 50.0));
        assert!(!is_near_bottom(549.0, 400.0, 1000.0, 50.0));
    }
}
