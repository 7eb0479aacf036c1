//! Client-side snapshot of what the table shows.

use std::collections::HashSet;

use shared::{
    domain::{MovieId, MovieRecord},
    protocol::{table_columns, DashboardView, MovieWire, Notice},
};

/// Records whose name contains `query`, ignoring case. An empty query keeps
/// every record. Order is preserved.
pub fn search_records(records: &[MovieRecord], query: &str) -> Vec<MovieRecord> {
    if query.is_empty() {
        return records.to_vec();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// `fetched` is the last full page from the inventory; `rows` is the view
/// derived from it. Searches always start again from `fetched`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    fetched: Vec<MovieRecord>,
    rows: Vec<MovieRecord>,
    query: Option<String>,
    notice: Option<Notice>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fetch(records: Vec<MovieRecord>) -> Self {
        Self {
            rows: records.clone(),
            fetched: records,
            query: None,
            notice: None,
        }
    }

    pub fn rows(&self) -> &[MovieRecord] {
        &self.rows
    }

    pub fn fetched(&self) -> &[MovieRecord] {
        &self.fetched
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn ids(&self) -> Vec<MovieId> {
        self.rows.iter().map(|record| record.id).collect()
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    pub fn clear_notice(mut self) -> Self {
        self.notice = None;
        self
    }

    pub fn searched(mut self, query: &str) -> Self {
        self.rows = search_records(&self.fetched, query);
        self.query = (!query.is_empty()).then(|| query.to_string());
        self
    }

    /// Maps row indices to ids in first-seen order. Out-of-range and repeated
    /// indices are dropped.
    pub fn resolve_selection(&self, selection: &[usize]) -> Vec<MovieId> {
        let mut seen = HashSet::new();
        selection
            .iter()
            .filter_map(|&index| self.rows.get(index))
            .map(|record| record.id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn row_for_selection(&self, selection: &[usize]) -> Option<&MovieRecord> {
        selection.iter().find_map(|&index| self.rows.get(index))
    }

    pub fn without_ids(mut self, ids: &[MovieId]) -> Self {
        let removed: HashSet<MovieId> = ids.iter().copied().collect();
        self.fetched.retain(|record| !removed.contains(&record.id));
        self.rows.retain(|record| !removed.contains(&record.id));
        self
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            columns: table_columns(),
            rows: self.rows.iter().map(MovieWire::from).collect(),
            query: self.query.clone(),
            notice: self.notice.clone(),
        }
    }
}
