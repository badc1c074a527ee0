use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Raw country record as returned by every REST Countries list endpoint.
///
/// Only the fields the explorer consumes are modeled; everything beyond `name.common`
/// is optional because the API omits keys freely (no capital, no borders, no currencies...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Country {
    pub name: CountryName,
    #[serde(default)]
    pub cca3: Option<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub capital: Option<Vec<String>>,
    #[serde(default)]
    pub flags: Option<Flags>,
    #[serde(default)]
    pub tld: Option<Vec<String>>,
    /// Values of the `currencies` object (keyed by ISO 4217 code), in response order.
    #[serde(default, deserialize_with = "de_object_values")]
    pub currencies: Option<Vec<Currency>>,
    /// Values of the `languages` object (keyed by ISO 639-3 code), in response order.
    #[serde(default, deserialize_with = "de_object_values")]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub borders: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryName {
    pub common: String,
    #[serde(default)]
    pub official: Option<String>,
    /// Values of the `nativeName` object (keyed by language), in response order.
    #[serde(default, rename = "nativeName", deserialize_with = "de_object_values")]
    pub native_name: Option<Vec<NativeName>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NativeName {
    #[serde(default)]
    pub official: Option<String>,
    #[serde(default)]
    pub common: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub svg: Option<String>,
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Currency {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Serde helper: read a JSON object and keep only its values, in document order.
/// `null` is accepted as "absent".
fn de_object_values<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    use serde::de::{self, IgnoredAny, MapAccess, Visitor};
    struct ValuesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for ValuesVisitor<T> {
        type Value = Option<Vec<T>>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a JSON object or null")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((_, value)) = map.next_entry::<IgnoredAny, T>()? {
                out.push(value);
            }
            Ok(Some(out))
        }
    }

    deserializer.deserialize_any(ValuesVisitor(PhantomData))
}

/// Card-sized projection produced by the list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySummary {
    pub common_name: String,
    pub flag_url: String,
    pub population: u64,
    pub region: String,
    pub capital: Option<String>,
}

impl From<&Country> for CountrySummary {
    fn from(c: &Country) -> Self {
        Self {
            common_name: c.name.common.clone(),
            flag_url: flag_url(c),
            population: c.population,
            region: c.region.clone().unwrap_or_default(),
            capital: c
                .capital
                .as_ref()
                .and_then(|caps| caps.first())
                .cloned(),
        }
    }
}

/// Everything the detail view shows about one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryDetail {
    pub common_name: String,
    pub native_name: Option<String>,
    pub population: u64,
    pub region: String,
    pub subregion: Option<String>,
    pub capitals: Vec<String>,
    pub top_level_domain: Option<String>,
    /// Currency names, deduplicated, in response order.
    pub currencies: Vec<String>,
    /// Language names, deduplicated, in response order.
    pub languages: Vec<String>,
    pub border_codes: Vec<String>,
    pub flag_url: String,
}

impl From<&Country> for CountryDetail {
    fn from(c: &Country) -> Self {
        let native_name = c
            .name
            .native_name
            .as_ref()
            .and_then(|names| names.first())
            .and_then(|n| n.common.clone())
            .filter(|s| !s.trim().is_empty());

        let currencies = dedup_in_order(
            c.currencies
                .iter()
                .flatten()
                .filter_map(|cur| cur.name.clone()),
        );
        let languages = dedup_in_order(c.languages.iter().flatten().cloned());

        Self {
            common_name: c.name.common.clone(),
            native_name,
            population: c.population,
            region: c.region.clone().unwrap_or_default(),
            subregion: c.subregion.clone().filter(|s| !s.is_empty()),
            capitals: c.capital.clone().unwrap_or_default(),
            top_level_domain: c.tld.as_ref().and_then(|t| t.first()).cloned(),
            currencies,
            languages,
            border_codes: c.borders.clone().unwrap_or_default(),
            flag_url: flag_url(c),
        }
    }
}

/// Fallback shown for any missing text field of the detail view.
pub const NOT_AVAILABLE: &str = "N/A";
/// Fallback shown when a country has no capital.
pub const NO_CAPITAL: &str = "No capital";

/// Detail fields with every fallback already applied; renderers print these as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailDisplay {
    pub native_name: String,
    pub capital: String,
    pub region: String,
    /// `None` hides the row entirely.
    pub subregion: Option<String>,
    pub top_level_domain: String,
    pub currencies: String,
    pub languages: String,
}

impl CountryDetail {
    pub fn display(&self) -> DetailDisplay {
        let or_na = |s: Option<&String>| s.cloned().unwrap_or_else(|| NOT_AVAILABLE.into());
        let join_or_na = |items: &[String]| {
            if items.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                items.join(", ")
            }
        };
        DetailDisplay {
            native_name: or_na(self.native_name.as_ref()),
            capital: self
                .capitals
                .first()
                .cloned()
                .unwrap_or_else(|| NO_CAPITAL.into()),
            region: if self.region.is_empty() {
                NOT_AVAILABLE.into()
            } else {
                self.region.clone()
            },
            subregion: self.subregion.clone(),
            top_level_domain: or_na(self.top_level_domain.as_ref()),
            currencies: join_or_na(&self.currencies),
            languages: join_or_na(&self.languages),
        }
    }
}

/// Minimal projection used for neighbor links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderCountry {
    pub code: String,
    pub common_name: String,
}

impl From<&Country> for BorderCountry {
    fn from(c: &Country) -> Self {
        Self {
            code: c.cca3.clone().unwrap_or_default(),
            common_name: c.name.common.clone(),
        }
    }
}

fn flag_url(c: &Country) -> String {
    c.flags
        .as_ref()
        .and_then(|f| f.svg.clone().or_else(|| f.png.clone()))
        .unwrap_or_default()
}

fn dedup_in_order(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
