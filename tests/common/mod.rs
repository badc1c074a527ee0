//! In-memory country sources shared by the integration tests.
#![allow(dead_code)]

use countries_rs::models::Country;
use countries_rs::{CountrySource, DataError, NameMatch};
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::mpsc::{Receiver, Sender};

/// One recorded call against a fake source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    All,
    Name(String, NameMatch),
    Region(String),
    Codes(Vec<String>),
}

pub fn country(
    name: &str,
    cca3: &str,
    region: &str,
    capital: Option<&str>,
    borders: &[&str],
    population: u64,
) -> Value {
    let mut v = json!({
        "name": { "common": name, "official": name },
        "cca3": cca3,
        "region": region,
        "population": population,
        "flags": { "svg": format!("https://flagcdn.com/{}.svg", cca3.to_lowercase()) },
        "borders": borders,
    });
    if let Some(cap) = capital {
        v["capital"] = json!([cap]);
    }
    v
}

/// A small world: enough to exercise sorting, exclusion, regions and borders.
pub fn world() -> Vec<Value> {
    let mut france = country("France", "FRA", "Europe", Some("Paris"), &["DEU", "BEL", "ESP"], 67_391_582);
    france["subregion"] = json!("Western Europe");
    france["tld"] = json!([".fr"]);
    france["currencies"] = json!({ "EUR": { "name": "Euro", "symbol": "€" } });
    france["languages"] = json!({ "fra": "French" });
    france["name"]["nativeName"] = json!({ "fra": { "official": "République française", "common": "France" } });

    let mut malaysia = country("Malaysia", "MYS", "Asia", Some("Kuala Lumpur"), &["THA", "IDN", "BRN", "SGP"], 32_365_998);
    malaysia["languages"] = json!({ "eng": "English", "msa": "Malay" });
    malaysia["currencies"] = json!({ "MYR": { "name": "Malaysian ringgit", "symbol": "RM" } });

    vec![
        france,
        country("Germany", "DEU", "Europe", Some("Berlin"), &["FRA", "BEL"], 83_240_525),
        country("Belgium", "BEL", "Europe", Some("Brussels"), &["FRA", "DEU"], 11_555_997),
        country("Spain", "ESP", "Europe", Some("Madrid"), &["FRA"], 47_351_567),
        country("Israel", "ISR", "Asia", Some("Jerusalem"), &["EGY", "JOR"], 9_216_900),
        country("Egypt", "EGY", "Africa", Some("Cairo"), &["ISR"], 102_334_403),
        malaysia,
        country("Thailand", "THA", "Asia", Some("Bangkok"), &["MYS"], 69_799_978),
        country("Indonesia", "IDN", "Asia", Some("Jakarta"), &["MYS"], 273_523_621),
        country("Brunei", "BRN", "Asia", Some("Bandar Seri Begawan"), &["MYS"], 437_483),
        country("Singapore", "SGP", "Asia", Some("Singapore"), &["MYS"], 5_685_807),
        country("Japan", "JPN", "Asia", Some("Tokyo"), &[], 125_836_021),
        country("Åland Islands", "ALA", "Europe", Some("Mariehamn"), &[], 29_458),
        country("Albania", "ALB", "Europe", Some("Tirana"), &[], 2_837_743),
        country("Antarctica", "ATA", "Antarctic", None, &[], 1_000),
        country("Curaçao", "CUW", "Americas", Some("Willemstad"), &[], 155_014),
        country("Cuba", "CUB", "Americas", Some("Havana"), &[], 11_326_616),
    ]
}

pub fn parse(values: Vec<Value>) -> Vec<Country> {
    serde_json::from_value(Value::Array(values)).unwrap()
}

/// Answers like the REST Countries API does, including 404 for "no match".
pub struct FakeSource {
    countries: Vec<Country>,
    calls: Mutex<Vec<Call>>,
    border_error: Option<fn() -> DataError>,
    fail_regions: bool,
}

impl FakeSource {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            countries: parse(values),
            calls: Mutex::new(Vec::new()),
            border_error: None,
            fail_regions: false,
        }
    }

    pub fn world() -> Self {
        Self::new(world())
    }

    pub fn failing_border_lookups(self) -> Self {
        self.border_lookups_failing_with(|| DataError::Transport("connection reset".into()))
    }

    pub fn border_lookups_failing_with(mut self, err: fn() -> DataError) -> Self {
        self.border_error = Some(err);
        self
    }

    pub fn failing_region_lookups(mut self) -> Self {
        self.fail_regions = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn matching(&self, pred: impl Fn(&Country) -> bool, what: &str) -> Result<Vec<Country>, DataError> {
        let hits: Vec<Country> = self.countries.iter().filter(|c| pred(c)).cloned().collect();
        if hits.is_empty() {
            Err(DataError::NotFound(what.to_string()))
        } else {
            Ok(hits)
        }
    }
}

impl CountrySource for FakeSource {
    fn all(&self) -> Result<Vec<Country>, DataError> {
        self.record(Call::All);
        Ok(self.countries.clone())
    }

    fn by_name(&self, text: &str, matching: NameMatch) -> Result<Vec<Country>, DataError> {
        self.record(Call::Name(text.to_string(), matching));
        let needle = text.to_lowercase();
        self.matching(
            |c| {
                let name = c.name.common.to_lowercase();
                match matching {
                    NameMatch::Partial => name.contains(&needle),
                    NameMatch::FullText => name == needle,
                }
            },
            text,
        )
    }

    fn by_region(&self, region: &str) -> Result<Vec<Country>, DataError> {
        self.record(Call::Region(region.to_string()));
        if self.fail_regions {
            return Err(DataError::Status(502));
        }
        self.matching(
            |c| c.region.as_deref().is_some_and(|r| r.eq_ignore_ascii_case(region)),
            region,
        )
    }

    fn by_codes(&self, codes: &[String]) -> Result<Vec<Country>, DataError> {
        self.record(Call::Codes(codes.to_vec()));
        if let Some(err) = self.border_error {
            return Err(err());
        }
        Ok(codes
            .iter()
            .filter_map(|code| {
                self.countries
                    .iter()
                    .find(|c| c.cca3.as_deref() == Some(code.as_str()))
                    .cloned()
            })
            .collect())
    }
}

/// Wraps [`FakeSource`] and holds the first name lookup until `release` is signalled.
/// Signals `finished` when that held lookup returns.
pub struct GatedSource {
    inner: FakeSource,
    gate: Mutex<Option<Receiver<()>>>,
    finished: Mutex<Sender<()>>,
}

impl GatedSource {
    pub fn new(inner: FakeSource, release: Receiver<()>, finished: Sender<()>) -> Self {
        Self {
            inner,
            gate: Mutex::new(Some(release)),
            finished: Mutex::new(finished),
        }
    }
}

impl CountrySource for GatedSource {
    fn all(&self) -> Result<Vec<Country>, DataError> {
        self.inner.all()
    }

    fn by_name(&self, text: &str, matching: NameMatch) -> Result<Vec<Country>, DataError> {
        let gate = self.gate.lock().unwrap().take();
        match gate {
            Some(release) => {
                let _ = release.recv();
                let out = self.inner.by_name(text, matching);
                let _ = self.finished.lock().unwrap().send(());
                out
            }
            None => self.inner.by_name(text, matching),
        }
    }

    fn by_region(&self, region: &str) -> Result<Vec<Country>, DataError> {
        self.inner.by_region(region)
    }

    fn by_codes(&self, codes: &[String]) -> Result<Vec<Country>, DataError> {
        self.inner.by_codes(codes)
    }
}
