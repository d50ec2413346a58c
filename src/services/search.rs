//! Global search: query state, lookup issuing, result merging, and selection.
//!
//! The engine issues one lookup per settled query (after a short quiet
//! period) against every record collection, each capped at a per-kind
//! limit. Settings pages are matched locally and appended last.
//!
//! Lookups may complete out of order. Every request carries a generation
//! number and the query text that triggered it; [`SearchEngine::accept`]
//! drops any response that is not for the latest generation and the current
//! query, so the displayed results always belong to what is in the input.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::RecordLookup;
use crate::catalog::settings_pages;
use crate::constants::{DEFAULT_DEBOUNCE_MS, DEFAULT_MIN_QUERY_LEN, DEFAULT_PER_KIND_LIMIT};
use crate::models::{RecordKind, SearchResult};

/// Tunables for the search engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Minimum trimmed query length (in characters) before a lookup is issued
    pub min_query_len: usize,
    /// Maximum results per record collection
    pub per_kind_limit: usize,
    /// Quiet period between the last edit and the lookup
    pub debounce: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            per_kind_limit: DEFAULT_PER_KIND_LIMIT,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

/// A lookup the engine wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Monotonic tag of this request
    pub generation: u64,
    /// Query text as it was in the input when the request was issued
    pub query: String,
}

/// The merged results of one lookup, tagged with its request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    /// Generation of the originating request
    pub generation: u64,
    /// Query of the originating request
    pub query: String,
    /// Results in group order
    pub results: Vec<SearchResult>,
}

/// Keys the result surface reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    /// Move selection up (wraps)
    Up,
    /// Move selection down (wraps)
    Down,
    /// Activate the selected result
    Enter,
    /// Close the result surface
    Escape,
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Nothing changed
    Ignored,
    /// Selection moved to this index
    Moved(usize),
    /// A result was activated; hand the target to the router
    Navigate(String),
    /// The result surface was closed
    Closed,
}

/// Navigation collaborator that receives selected targets.
pub trait Router {
    /// Navigates to `target`.
    fn navigate(&mut self, target: &str);
}

/// Router that remembers every target it was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRouter {
    history: Vec<String>,
}

impl HistoryRouter {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent target, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    /// Every target in navigation order.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Router for HistoryRouter {
    fn navigate(&mut self, target: &str) {
        debug!(target, "Navigating");
        self.history.push(target.to_string());
    }
}

/// A run of results of one kind, for rendering under a group header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultGroup<'a> {
    /// Kind shared by every entry
    pub kind: RecordKind,
    /// Header text (e.g., "Leads")
    pub header: String,
    /// Entries with their index in the flat result list
    pub entries: Vec<(usize, &'a SearchResult)>,
}

/// Search input and result surface state.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    settings: SearchSettings,
    query: String,
    open: bool,
    loading: bool,
    results: Vec<SearchResult>,
    selected_index: usize,
    /// Generation of the most recently issued request
    generation: u64,
    /// Deadline after which the pending query should be looked up
    due_at: Option<Instant>,
}

impl SearchEngine {
    /// Creates an empty, closed engine.
    #[must_use]
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            query: String::new(),
            open: false,
            loading: false,
            results: Vec::new(),
            selected_index: 0,
            generation: 0,
            due_at: None,
        }
    }

    /// Engine tunables.
    #[must_use]
    pub const fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Current input text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the result surface is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Whether a lookup for the current query is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a lookup is waiting for its quiet period to elapse.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.due_at.is_some()
    }

    /// Current merged results.
    #[must_use]
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Index of the highlighted result.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Returns true if `query` is long enough to be looked up.
    #[must_use]
    pub fn meets_threshold(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.settings.min_query_len
    }

    /// Updates the input text.
    ///
    /// Results of the previous query are cleared immediately, so nothing
    /// stale can be selected. Below the length threshold no lookup is
    /// scheduled. Otherwise a lookup becomes due once the quiet period has
    /// passed without further edits.
    pub fn set_query(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        if text == self.query {
            return;
        }
        self.query = text;
        self.open = true;
        self.set_results(Vec::new());

        if self.meets_threshold(&self.query) {
            self.due_at = Some(now + self.settings.debounce);
        } else {
            self.invalidate();
        }
    }

    /// Shows the result surface again (e.g., when the input regains focus).
    pub fn focus(&mut self) {
        self.open = true;
    }

    /// Returns the pending lookup if its quiet period has elapsed.
    pub fn take_due_request(&mut self, now: Instant) -> Option<LookupRequest> {
        match self.due_at {
            Some(due) if now >= due => Some(self.issue()),
            _ => None,
        }
    }

    /// Issues the pending lookup immediately, skipping the quiet period.
    pub fn flush(&mut self) -> Option<LookupRequest> {
        if self.due_at.is_some() {
            Some(self.issue())
        } else {
            None
        }
    }

    fn issue(&mut self) -> LookupRequest {
        self.due_at = None;
        self.generation += 1;
        self.loading = true;
        debug!(generation = self.generation, query = %self.query, "Issuing search lookup");
        LookupRequest {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    /// Discards any pending or in-flight lookup.
    fn invalidate(&mut self) {
        self.due_at = None;
        self.loading = false;
        self.generation += 1;
    }

    /// Performs a lookup against every collection and merges the results.
    ///
    /// Each collection is queried independently; a failing collection
    /// contributes nothing and does not affect the others.
    #[must_use]
    pub fn execute_lookup(
        lookup: &dyn RecordLookup,
        request: &LookupRequest,
        settings: &SearchSettings,
    ) -> LookupResponse {
        let needle = request.query.trim();
        let mut results = Vec::new();

        for kind in RecordKind::COLLECTIONS {
            match lookup.find(kind, needle, settings.per_kind_limit) {
                Ok(records) => {
                    results.extend(records.iter().map(|record| record.to_search_result()));
                }
                Err(error) => {
                    warn!(
                        collection = kind.collection(),
                        "Search lookup failed, skipping collection: {error:#}"
                    );
                }
            }
        }

        // Settings pages are a small fixed table, so they are not capped
        results.extend(settings_pages::matching_pages(needle));

        LookupResponse {
            generation: request.generation,
            query: request.query.clone(),
            results,
        }
    }

    /// Applies a lookup response if it is still current.
    ///
    /// Returns false for superseded responses, which are discarded.
    pub fn accept(&mut self, response: LookupResponse) -> bool {
        if response.generation != self.generation || response.query != self.query {
            debug!(
                generation = response.generation,
                latest = self.generation,
                query = %response.query,
                "Discarding stale search response"
            );
            return false;
        }
        self.loading = false;
        self.set_results(response.results);
        true
    }

    /// Runs the current query synchronously, bypassing the quiet period.
    ///
    /// Used by headless callers that have no event loop.
    pub fn search_now(&mut self, lookup: &dyn RecordLookup) -> &[SearchResult] {
        if let Some(request) = self.flush() {
            let response = Self::execute_lookup(lookup, &request, &self.settings);
            self.accept(response);
        }
        &self.results
    }

    fn set_results(&mut self, results: Vec<SearchResult>) {
        self.results = results;
        self.selected_index = 0;
    }

    /// Handles a key press while the input has focus.
    pub fn handle_key(&mut self, key: SearchKey) -> SearchOutcome {
        if key == SearchKey::Escape {
            if !self.open {
                return SearchOutcome::Ignored;
            }
            self.open = false;
            return SearchOutcome::Closed;
        }

        let count = self.results.len();
        if !self.open || count == 0 {
            return SearchOutcome::Ignored;
        }

        match key {
            SearchKey::Down => {
                self.selected_index = (self.selected_index + 1) % count;
                SearchOutcome::Moved(self.selected_index)
            }
            SearchKey::Up => {
                self.selected_index = (self.selected_index + count - 1) % count;
                SearchOutcome::Moved(self.selected_index)
            }
            SearchKey::Enter => self
                .select(self.selected_index)
                .map_or(SearchOutcome::Ignored, SearchOutcome::Navigate),
            SearchKey::Escape => SearchOutcome::Ignored,
        }
    }

    /// Selects the result at `index`.
    ///
    /// Clears the query, closes the surface, and returns the result's target.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let target = self.results.get(index)?.target.clone();
        self.query.clear();
        self.open = false;
        self.invalidate();
        self.set_results(Vec::new());
        Some(target)
    }

    /// Selects the result at `index` and sends its target to `router`.
    ///
    /// Returns false if there is no result at `index`.
    pub fn activate(&mut self, index: usize, router: &mut dyn Router) -> bool {
        match self.select(index) {
            Some(target) => {
                router.navigate(&target);
                true
            }
            None => false,
        }
    }

    /// Moves the highlight to `index` under the pointer.
    pub fn hover(&mut self, index: usize) {
        if index < self.results.len() {
            self.selected_index = index;
        }
    }

    /// Reacts to a pointer press; presses outside the input and dropdown close it.
    pub fn pointer_down(&mut self, inside: bool) {
        if !inside && self.open {
            self.open = false;
        }
    }

    /// Results grouped by kind, in order of first appearance.
    #[must_use]
    pub fn grouped(&self) -> Vec<ResultGroup<'_>> {
        let mut groups: Vec<ResultGroup<'_>> = Vec::new();
        for (index, result) in self.results.iter().enumerate() {
            if let Some(group) = groups.iter_mut().find(|g| g.kind == result.kind) {
                group.entries.push((index, result));
            } else {
                groups.push(ResultGroup {
                    kind: result.kind,
                    header: result.kind.group_header(),
                    entries: vec![(index, result)],
                });
            }
        }
        groups
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchSettings::default())
    }
}
