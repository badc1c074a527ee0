use crate::models::CountrySummary;
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save a country list as CSV with header.
pub fn save_csv<P: AsRef<Path>>(countries: &[CountrySummary], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("common_name", "region", "capital", "population", "flag_url"))?;
    for c in countries {
        wtr.serialize((
            &c.common_name,
            &c.region,
            &c.capital,
            c.population,
            &c.flag_url,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a country list as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(countries: &[CountrySummary], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(countries)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Vec<CountrySummary> {
        vec![
            CountrySummary {
                common_name: "Antarctica".into(),
                flag_url: "https://flagcdn.com/aq.svg".into(),
                population: 1000,
                region: "Antarctic".into(),
                capital: None,
            },
            CountrySummary {
                common_name: "France".into(),
                flag_url: "https://flagcdn.com/fr.svg".into(),
                population: 67_391_582,
                region: "Europe".into(),
                capital: Some("Paris".into()),
            },
        ]
    }

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        save_csv(&sample(), &csvp).unwrap();
        save_json(&sample(), &jsonp).unwrap();

        let csv = std::fs::read_to_string(&csvp).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("common_name,region,capital,population,flag_url")
        );
        assert_eq!(
            lines.next(),
            Some("Antarctica,Antarctic,,1000,https://flagcdn.com/aq.svg")
        );

        let back: Vec<CountrySummary> =
            serde_json::from_str(&std::fs::read_to_string(&jsonp).unwrap()).unwrap();
        assert_eq!(back, sample());
    }
}
