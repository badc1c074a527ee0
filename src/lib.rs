//! countries_rs
//!
//! A lightweight Rust library for browsing, searching, and inspecting countries from the
//! REST Countries API. Pairs with the `countries` CLI and the `countries-gui` desktop app.
//!
//! ### Features
//! - List every country, search by name (partial or full text), or filter by region
//! - Lists are locale-sorted, filtered, deduplicated and capped in one place
//! - Resolve a country's detail record plus its border neighbors
//! - Loading / ready / failed state per resolver, with stale results discarded
//! - Persisted dark-mode preference
//!
//! ### Example
//! ```no_run
//! use countries_rs::{Client, Config, QueryState, query, detail};
//!
//! let client = Client::default();
//! let config = Config::default();
//! let asia = query::resolve(&client, &QueryState::region("Asia"), &config);
//! let view = detail::resolve_detail(&client, "Malaysia", &config)?;
//! println!("{:?} / {} neighbors", asia.ready().map(|l| l.len()), view.borders.len());
//! # Ok::<(), countries_rs::DataError>(())
//! ```

pub mod api;
pub mod collate;
pub mod config;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod format;
pub mod models;
pub mod prefs;
pub mod query;
pub mod storage;

pub use api::{Client, CountrySource};
pub use config::{BorderFailurePolicy, Config};
pub use detail::{CountryView, DetailResolver};
pub use error::DataError;
pub use fetch::FetchState;
pub use models::{BorderCountry, CountryDetail, CountrySummary};
pub use prefs::DarkMode;
pub use query::{NameMatch, QueryMode, QueryResolver, QueryState};
