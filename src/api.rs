//! Synchronous client for the **REST Countries API (v3.1)**.
//!
//! Four call shapes are used, all returning a JSON array of country records:
//! - `GET /all`: every country
//! - `GET /name/{text}[?fullText=true]`: partial or exact name match
//! - `GET /region/{region}`: one continent-level region
//! - `GET /alpha?codes=A,B,C`: batch lookup by alpha-3 code
//!
//! ### Notes
//! - The API answers "no match" with HTTP 404 and a JSON *object*; that surfaces here as
//!   [`DataError::NotFound`] so callers can tell it apart from a broken request.
//! - Transient failures (network errors, 5xx) are retried with a short backoff.
//!
//! Typical usage:
//! ```no_run
//! # use countries_rs::{Client, CountrySource, NameMatch};
//! let client = Client::default();
//! let hits = client.by_name("france", NameMatch::FullText)?;
//! # Ok::<(), countries_rs::DataError>(())
//! ```
use crate::config::Config;
use crate::error::{DataError, Result};
use crate::models::Country;
use crate::query::NameMatch;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::time::Duration;

/// The remote collaborator both resolvers talk to.
///
/// [`Client`] is the HTTP implementation; tests substitute in-memory sources.
pub trait CountrySource: Send + Sync {
    fn all(&self) -> Result<Vec<Country>>;
    fn by_name(&self, text: &str, matching: NameMatch) -> Result<Vec<Country>>;
    fn by_region(&self, region: &str) -> Result<Vec<Country>>;
    fn by_codes(&self, codes: &[String]) -> Result<Vec<Country>>;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

// Path segments: keep unreserved characters readable, escape everything else (spaces, '/', '?').
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub(crate) fn enc_segment(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, SEGMENT).to_string()
}

fn enc_codes<'a>(codes: impl IntoIterator<Item = &'a String>) -> String {
    codes
        .into_iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(enc_segment)
        .collect::<Vec<_>>()
        .join(",")
}

impl Client {
    pub fn new(config: &Config) -> Self {
        let http = HttpClient::builder()
            .timeout(config.timeout) // total request timeout
            .connect_timeout(config.connect_timeout)
            .redirect(Policy::limited(5))
            .user_agent(concat!("countries_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            // Only fails when the TLS backend cannot initialise; fall back to reqwest's defaults.
            .unwrap_or_else(|e| {
                log::warn!("custom http client unavailable ({e}); using defaults");
                HttpClient::new()
            });
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// GET `url` and decode a country array, retrying transient failures.
    fn get_countries(&self, url: &str) -> Result<Vec<Country>> {
        let mut last_err = DataError::Transport("no attempt made".into());
        for backoff_ms in [100u64, 300, 700] {
            match self.get_once(url) {
                Ok(countries) => return Ok(countries),
                Err(e) if e.is_transient() => {
                    log::warn!("GET {url} failed ({e}); retrying in {backoff_ms}ms");
                    last_err = e;
                }
                Err(e) => return Err(e),
            }
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        Err(last_err)
    }

    fn get_once(&self, url: &str) -> Result<Vec<Country>> {
        log::debug!("GET {url}");
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DataError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(DataError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        parse_countries(&body)
    }
}

/// Decode a response body that must be a JSON array of country records.
///
/// Records are decoded straight from the text so keyed objects keep their response order.
pub fn parse_countries(body: &str) -> Result<Vec<Country>> {
    if !body.trim_start().starts_with('[') {
        return Err(DataError::Parse("expected a JSON array of countries".into()));
    }
    Ok(serde_json::from_str(body)?)
}

impl CountrySource for Client {
    fn all(&self) -> Result<Vec<Country>> {
        self.get_countries(&format!("{}/all", self.base_url))
    }

    fn by_name(&self, text: &str, matching: NameMatch) -> Result<Vec<Country>> {
        let mut url = format!("{}/name/{}", self.base_url, enc_segment(text.trim()));
        if matching == NameMatch::FullText {
            url.push_str("?fullText=true");
        }
        self.get_countries(&url)
    }

    fn by_region(&self, region: &str) -> Result<Vec<Country>> {
        self.get_countries(&format!(
            "{}/region/{}",
            self.base_url,
            enc_segment(region.trim())
        ))
    }

    fn by_codes(&self, codes: &[String]) -> Result<Vec<Country>> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        self.get_countries(&format!(
            "{}/alpha?codes={}",
            self.base_url,
            enc_codes(codes)
        ))
    }
}
