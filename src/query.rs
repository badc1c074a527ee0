//! List queries: which endpoint to call for the current search/region input, and how the
//! returned records become the sorted, filtered, capped list the renderer shows.

use crate::api::CountrySource;
use crate::collate;
use crate::config::Config;
use crate::error::{DataError, Result};
use crate::fetch::{FetchState, Slot};
use crate::models::{Country, CountrySummary};
use std::sync::Arc;
use std::thread;

/// Region selector values, in display order. `"All"` means no region filter.
pub const REGIONS: [&str; 6] = ["All", "Africa", "Americas", "Asia", "Europe", "Oceania"];

/// Region value that disables region filtering.
pub const ALL_REGIONS: &str = "All";

/// How a name query matches on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatch {
    /// Substring match (`/name/fra` finds France).
    #[default]
    Partial,
    /// Exact match on the full common or official name.
    FullText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    #[default]
    All,
    Name,
    Region,
}

/// The user's current list input. Mutated only by the input handlers on [`QueryResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryState {
    pub mode: QueryMode,
    pub text: String,
}

impl QueryState {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn name(text: impl Into<String>) -> Self {
        Self {
            mode: QueryMode::Name,
            text: text.into(),
        }
    }

    pub fn region(region: impl Into<String>) -> Self {
        Self {
            mode: QueryMode::Region,
            text: region.into(),
        }
    }

    /// The remote request this input maps to. Blank search text and the `"All"` region
    /// both collapse to [`ListRequest::All`].
    pub fn request(&self, matching: NameMatch) -> ListRequest {
        let text = self.text.trim();
        match self.mode {
            QueryMode::All => ListRequest::All,
            QueryMode::Name if text.is_empty() => ListRequest::All,
            QueryMode::Name => ListRequest::Name {
                text: text.to_string(),
                matching,
            },
            QueryMode::Region if text.is_empty() || text == ALL_REGIONS => ListRequest::All,
            QueryMode::Region => ListRequest::Region(text.to_string()),
        }
    }
}

/// One of the three list call shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRequest {
    All,
    Name { text: String, matching: NameMatch },
    Region(String),
}

impl ListRequest {
    /// Result cap for this request shape.
    pub fn limit(&self, config: &Config) -> Option<usize> {
        match self {
            ListRequest::All | ListRequest::Name { .. } => config.list_limit,
            ListRequest::Region(_) => config.region_limit,
        }
    }

    fn fetch(&self, source: &dyn CountrySource) -> Result<Vec<Country>> {
        match self {
            ListRequest::All => source.all(),
            ListRequest::Name { text, matching } => source.by_name(text, *matching),
            ListRequest::Region(region) => source.by_region(region),
        }
    }
}

/// Exclusion filter, locale-aware sort, dedup by common name, then the cap.
pub fn normalize_list(
    countries: &[Country],
    config: &Config,
    limit: Option<usize>,
) -> Vec<CountrySummary> {
    let mut list: Vec<CountrySummary> = countries
        .iter()
        .filter(|c| !config.is_excluded(&c.name.common))
        .map(CountrySummary::from)
        .collect();
    collate::sort_by_name(&mut list, |c| c.common_name.as_str());
    list.dedup_by(|a, b| a.common_name == b.common_name);
    if let Some(limit) = limit {
        list.truncate(limit);
    }
    list
}

/// Run one list request to completion. "No match" (HTTP 404) is an empty list, not an error.
pub fn fetch_list(
    source: &dyn CountrySource,
    request: &ListRequest,
    config: &Config,
) -> Result<Vec<CountrySummary>> {
    let countries = match request.fetch(source) {
        Ok(countries) => countries,
        Err(DataError::NotFound(_)) => Vec::new(),
        Err(e) => return Err(e),
    };
    Ok(normalize_list(&countries, config, request.limit(config)))
}

/// Resolve `state` synchronously with the configured name-match sub-mode.
pub fn resolve(
    source: &dyn CountrySource,
    state: &QueryState,
    config: &Config,
) -> FetchState<Vec<CountrySummary>> {
    resolve_with(source, state, config.name_match, config)
}

/// Resolve `state` synchronously, choosing partial or full-text name matching at the call site.
pub fn resolve_with(
    source: &dyn CountrySource,
    state: &QueryState,
    matching: NameMatch,
    config: &Config,
) -> FetchState<Vec<CountrySummary>> {
    let request = state.request(matching);
    let result = fetch_list(source, &request, config);
    if let Err(e) = &result {
        log::warn!("list query {:?} failed: {}", request, e);
    }
    result.into()
}

/// Owns the list slot: the current query, its visible state, and the background fetches
/// that feed it. A new query supersedes every query still in flight.
pub struct QueryResolver {
    source: Arc<dyn CountrySource>,
    config: Arc<Config>,
    query: QueryState,
    slot: Slot<Vec<CountrySummary>>,
}

impl QueryResolver {
    pub fn new(source: Arc<dyn CountrySource>, config: Config) -> Self {
        Self {
            source,
            config: Arc::new(config),
            query: QueryState::all(),
            slot: Slot::new(),
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn state(&self) -> &FetchState<Vec<CountrySummary>> {
        self.slot.state()
    }

    /// Search box handler.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.query = QueryState::name(text);
        self.refresh();
    }

    /// Region selector handler.
    pub fn set_region(&mut self, region: impl Into<String>) {
        self.query = QueryState::region(region);
        self.refresh();
    }

    /// Re-run the current query with the configured name-match sub-mode.
    pub fn refresh(&mut self) {
        self.refresh_matching(self.config.name_match);
    }

    /// Re-run the current query in the background with an explicit name-match sub-mode.
    pub fn refresh_matching(&mut self, matching: NameMatch) {
        let request = self.query.request(matching);
        let ticket = self.slot.begin();
        log::debug!(
            "list query #{} -> {:?}",
            ticket.generation(),
            request
        );
        let source = Arc::clone(&self.source);
        let config = Arc::clone(&self.config);
        thread::spawn(move || {
            let result = fetch_list(source.as_ref(), &request, &config);
            if let Err(e) = &result {
                log::warn!("list query {:?} failed: {}", request, e);
            }
            ticket.complete(result);
        });
    }

    /// Apply finished fetches; returns true when the visible state changed.
    pub fn poll(&mut self) -> bool {
        self.slot.poll()
    }

    /// Block until the latest query has settled.
    pub fn wait(&mut self) -> &FetchState<Vec<CountrySummary>> {
        self.slot.wait()
    }
}
