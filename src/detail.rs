//! Single-country lookups: the detail record by exact name, then its neighbors by
//! one batched alpha-3 code query.

use crate::api::{CountrySource, enc_segment};
use crate::config::{BorderFailurePolicy, Config};
use crate::error::{DataError, Result};
use crate::fetch::{FetchState, Slot};
use crate::models::{BorderCountry, CountryDetail};
use crate::query::NameMatch;
use percent_encoding::percent_decode_str;
use std::sync::Arc;
use std::thread;

/// Message shown when the detail query matched nothing.
pub const LOAD_FAILED: &str = "Failed to load country data. Please try again.";

const ROUTE_PREFIX: &str = "/country/";

/// A resolved detail page: the country plus its (filtered) neighbors, in response order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryView {
    pub detail: CountryDetail,
    pub borders: Vec<BorderCountry>,
}

/// Route that addresses a country's detail view, e.g. `/country/United%20Kingdom`.
pub fn country_route(common_name: &str) -> String {
    format!("{ROUTE_PREFIX}{}", enc_segment(common_name))
}

/// Decode a URL-encoded route parameter back to the display name.
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn decode_name(param: &str) -> String {
    percent_decode_str(param).decode_utf8_lossy().into_owned()
}

/// Extract and decode the country name from a detail route; `None` for any other path.
pub fn parse_route(path: &str) -> Option<String> {
    let param = path.strip_prefix(ROUTE_PREFIX)?.trim_end_matches('/');
    if param.is_empty() || param.contains('/') {
        return None;
    }
    Some(decode_name(param))
}

/// Fetch one country by exact name and its neighbors.
///
/// The first match wins when the name is ambiguous. No batch call is made when the country
/// has no borders. A failing batch call fails the whole lookup unless the config says
/// [`BorderFailurePolicy::Degrade`].
pub fn resolve_detail(
    source: &dyn CountrySource,
    name: &str,
    config: &Config,
) -> Result<CountryView> {
    let matches = match source.by_name(name, NameMatch::FullText) {
        Ok(matches) => matches,
        Err(DataError::NotFound(_)) => Vec::new(),
        Err(e) => return Err(e),
    };
    let first = matches
        .first()
        .ok_or_else(|| DataError::NotFound(name.to_string()))?;
    let detail = CountryDetail::from(first);

    let borders = if detail.border_codes.is_empty() {
        Vec::new()
    } else {
        match source.by_codes(&detail.border_codes) {
            Ok(neighbors) => neighbors
                .iter()
                .filter(|c| !config.is_excluded(&c.name.common))
                .map(BorderCountry::from)
                .collect(),
            Err(e) => match config.border_policy {
                BorderFailurePolicy::Fail => return Err(border_failure(e)),
                BorderFailurePolicy::Degrade => {
                    log::warn!("border lookup for {} failed: {}", detail.common_name, e);
                    Vec::new()
                }
            },
        }
    };

    Ok(CountryView { detail, borders })
}

// A 404 from the batch call is a broken lookup, not an unknown country.
fn border_failure(e: DataError) -> DataError {
    match e {
        DataError::NotFound(_) => DataError::Status(404),
        other => other,
    }
}

fn into_state(result: Result<CountryView>) -> FetchState<CountryView> {
    match result {
        Ok(view) => FetchState::Ready(view),
        Err(DataError::NotFound(name)) => {
            log::warn!("no country named {name:?}");
            FetchState::Failed(LOAD_FAILED.into())
        }
        Err(e) => {
            log::warn!("detail lookup failed: {e}");
            FetchState::Failed(e.to_string())
        }
    }
}

/// Resolve a detail view synchronously into a renderable state.
pub fn resolve_detail_state(
    source: &dyn CountrySource,
    name: &str,
    config: &Config,
) -> FetchState<CountryView> {
    into_state(resolve_detail(source, name, config))
}

/// Owns the detail slot. Each distinct name triggers one background lookup; navigating
/// again before it finishes supersedes it.
pub struct DetailResolver {
    source: Arc<dyn CountrySource>,
    config: Arc<Config>,
    name: Option<String>,
    slot: Slot<CountryView>,
}

impl DetailResolver {
    pub fn new(source: Arc<dyn CountrySource>, config: Config) -> Self {
        Self {
            source,
            config: Arc::new(config),
            name: None,
            slot: Slot::new(),
        }
    }

    /// The decoded name currently shown (or loading).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn state(&self) -> &FetchState<CountryView> {
        self.slot.state()
    }

    /// Show `name` (already decoded). Returns false when that name is already current.
    pub fn navigate(&mut self, name: &str) -> bool {
        if self.name.as_deref() == Some(name) {
            return false;
        }
        self.name = Some(name.to_string());
        self.reload();
        true
    }

    /// Show the country addressed by a URL-encoded route parameter.
    pub fn navigate_encoded(&mut self, param: &str) -> bool {
        self.navigate(&decode_name(param))
    }

    /// Re-run the lookup for the current name, e.g. after a failure.
    pub fn reload(&mut self) {
        let Some(name) = self.name.clone() else {
            return;
        };
        let ticket = self.slot.begin();
        log::debug!("detail lookup #{} -> {:?}", ticket.generation(), name);
        let source = Arc::clone(&self.source);
        let config = Arc::clone(&self.config);
        thread::spawn(move || {
            ticket.complete(into_state(resolve_detail(source.as_ref(), &name, &config)));
        });
    }

    pub fn poll(&mut self) -> bool {
        self.slot.poll()
    }

    pub fn wait(&mut self) -> &FetchState<CountryView> {
        self.slot.wait()
    }
}
