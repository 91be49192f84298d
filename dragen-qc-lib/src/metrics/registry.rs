use super::{ColumnHeader, HeaderConfig, TableView};
use crate::HashMap;
use compact_str::CompactString;

/// Column headers keyed by metric key, kept in first-seen order.
///
/// A key is registered once; later registrations of the same key are ignored so the
/// first file to mention a metric decides its presentation.
#[derive(Debug, Clone, Default)]
pub struct HeaderRegistry {
    order: Vec<CompactString>,
    headers: HashMap<CompactString, HeaderConfig>,
}

impl HeaderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a header unless the key is already known. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, key: &str, make: impl FnOnce() -> HeaderConfig) -> bool {
        if self.headers.contains_key(key) {
            return false;
        }

        let key = CompactString::new(key);
        self.order.push(key.clone());
        let _ = self.headers.insert(key, make());
        true
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&HeaderConfig> {
        self.headers.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.headers.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Headers in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderConfig)> {
        self.order.iter().filter_map(|key| self.headers.get(key).map(|header| (key.as_str(), header)))
    }

    /// Finalize the headers for one table view, ordered by priority and then first sight.
    ///
    /// Only keys accepted by `keep` are emitted.
    pub fn columns(&self, view: TableView, mut keep: impl FnMut(&str) -> bool) -> Vec<ColumnHeader> {
        let mut columns: Vec<ColumnHeader> = self
            .iter()
            .filter(|(key, _)| keep(key))
            .map(|(key, header)| header.to_column(key, view))
            .collect();

        // stable, so equal priorities keep first-seen order
        columns.sort_by_key(|column| column.priority);
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{PANEL_PRIORITY_OFFSET, Section};

    fn header(title: &str) -> HeaderConfig {
        let mut header = HeaderConfig::section_defaults(Section::CnvSummary);
        header.title = title.into();
        header
    }

    #[test]
    fn test_insert_if_absent_keeps_first() {
        let mut registry = HeaderRegistry::new();
        assert!(registry.insert_if_absent("a", || header("first")));
        assert!(!registry.insert_if_absent("a", || header("second")));
        assert_eq!(registry.get("a").unwrap().title, "first");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_iter_in_first_seen_order() {
        let mut registry = HeaderRegistry::new();
        for key in ["z", "a", "m", "a"] {
            let _ = registry.insert_if_absent(key, || header(key));
        }
        let keys: Vec<_> = registry.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_columns_sort_by_priority_then_order() {
        let mut registry = HeaderRegistry::new();
        let _ = registry.insert_if_absent("panel", || {
            let mut h = header("panel");
            h.priority = PANEL_PRIORITY_OFFSET + 2;
            h
        });
        let _ = registry.insert_if_absent("b", || header("b"));
        let _ = registry.insert_if_absent("a", || header("a"));

        let keys: Vec<_> = registry
            .columns(TableView::General, |_| true)
            .into_iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(keys, ["b", "a", "panel"]);
    }

    #[test]
    fn test_columns_filter() {
        let mut registry = HeaderRegistry::new();
        let _ = registry.insert_if_absent("keep", || header("keep"));
        let _ = registry.insert_if_absent("drop", || header("drop"));
        let columns = registry.columns(TableView::Module, |key| key == "keep");
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].key, "keep");
    }
}
