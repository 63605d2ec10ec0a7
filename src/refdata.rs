//! Reference tables joined against API results.
//!
//! The bundle is loaded once at startup and injected into
//! [`Client`](crate::Client). Each table is independently optional:
//! a missing or unreadable file degrades the dependent feature (country
//! filtering or commodity enrichment) with a warning instead of failing
//! requests.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use serde::Deserialize;

/// Immutable bundle of the three reference tables.
///
/// Never mutated after construction, so a single bundle is safe to share
/// across any number of concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    countries: Option<CountryTable>,
    hs2_names: Option<Hs2NameTable>,
    hs2_sections: Option<Hs2SectionTable>,
}

impl ReferenceData {
    /// A bundle with no tables loaded. Requests still work; country
    /// filtering and commodity enrichment degrade with warnings.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads `country.csv`, `hs2_reference.csv`, and `hs2_section.csv`
    /// from `dir`. A file that is missing or fails to parse leaves the
    /// corresponding table absent.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            countries: load_table(dir, "country.csv", CountryTable::from_path),
            hs2_names: load_table(dir, "hs2_reference.csv", Hs2NameTable::from_path),
            hs2_sections: load_table(dir, "hs2_section.csv", Hs2SectionTable::from_path),
        }
    }

    pub fn with_countries(mut self, countries: CountryTable) -> Self {
        self.countries = Some(countries);
        self
    }

    pub fn with_hs2_names(mut self, names: Hs2NameTable) -> Self {
        self.hs2_names = Some(names);
        self
    }

    pub fn with_hs2_sections(mut self, sections: Hs2SectionTable) -> Self {
        self.hs2_sections = Some(sections);
        self
    }

    /// Numeric country code for an ISO code, if the country table is
    /// loaded and has the code.
    pub(crate) fn country_code(&self, iso: &str) -> Option<&str> {
        self.countries.as_ref()?.get(iso)
    }

    pub(crate) fn hs2_names(&self) -> Option<&Hs2NameTable> {
        self.hs2_names.as_ref()
    }

    pub(crate) fn hs2_sections(&self) -> Option<&Hs2SectionTable> {
        self.hs2_sections.as_ref()
    }
}

fn load_table<T>(
    dir: &Path,
    file: &str,
    parse: fn(&Path) -> Result<T, csv::Error>,
) -> Option<T> {
    let path = dir.join(file);
    match parse(&path) {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::warn!("Could not load {}: {}", path.display(), e);
            None
        }
    }
}

#[derive(Deserialize)]
struct CountryRow {
    #[serde(rename = "ISO Code")]
    iso_code: String,
    #[serde(rename = "Code")]
    code: String,
}

/// ISO country code (case-insensitive) to numeric Census country code.
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    codes: HashMap<String, String>,
}

impl CountryTable {
    pub fn from_path(path: &Path) -> Result<Self, csv::Error> {
        Self::from_csv(csv::Reader::from_path(path)?)
    }

    /// Parses CSV content with `ISO Code` and `Code` columns.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, csv::Error> {
        let mut codes = HashMap::new();
        for row in reader.deserialize() {
            let row: CountryRow = row?;
            codes.insert(
                row.iso_code.trim().to_ascii_uppercase(),
                row.code.trim().to_string(),
            );
        }
        Ok(Self { codes })
    }

    pub fn get(&self, iso: &str) -> Option<&str> {
        self.codes
            .get(&iso.trim().to_ascii_uppercase())
            .map(String::as_str)
    }
}

#[derive(Deserialize)]
struct Hs2Row {
    #[serde(rename = "HS2")]
    hs2: String,
    #[serde(rename = "HS2_Name")]
    name: String,
}

/// HS2 commodity code to its name.
#[derive(Debug, Clone, Default)]
pub struct Hs2NameTable {
    names: HashMap<String, String>,
}

impl Hs2NameTable {
    pub fn from_path(path: &Path) -> Result<Self, csv::Error> {
        Self::from_csv(csv::Reader::from_path(path)?)
    }

    /// Parses CSV content with `HS2` and `HS2_Name` columns.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, csv::Error> {
        let mut names = HashMap::new();
        for row in reader.deserialize() {
            let row: Hs2Row = row?;
            names.insert(row.hs2.trim().to_string(), row.name);
        }
        Ok(Self { names })
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }
}

#[derive(Deserialize)]
struct SectionRow {
    #[serde(rename = "HS2_Code")]
    hs2_code: String,
    #[serde(rename = "Section")]
    section: String,
    #[serde(rename = "Section_Title")]
    title: String,
}

/// Section id and title for one HS2 code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hs2Section {
    pub id: String,
    pub title: String,
}

/// HS2 commodity code to its broader section.
#[derive(Debug, Clone, Default)]
pub struct Hs2SectionTable {
    sections: HashMap<String, Hs2Section>,
}

impl Hs2SectionTable {
    pub fn from_path(path: &Path) -> Result<Self, csv::Error> {
        Self::from_csv(csv::Reader::from_path(path)?)
    }

    /// Parses CSV content with `HS2_Code`, `Section`, and `Section_Title`
    /// columns.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, csv::Error> {
        let mut sections = HashMap::new();
        for row in reader.deserialize() {
            let row: SectionRow = row?;
            sections.insert(
                row.hs2_code.trim().to_string(),
                Hs2Section {
                    id: row.section,
                    title: row.title,
                },
            );
        }
        Ok(Self { sections })
    }

    pub fn get(&self, code: &str) -> Option<&Hs2Section> {
        self.sections.get(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_lookup_normalizes_case_and_whitespace() {
        let table = CountryTable::from_reader("ISO Code,Code\nGB,4120\n fr ,4279\n".as_bytes()).unwrap();
        assert_eq!(table.get("gb"), Some("4120"));
        assert_eq!(table.get("GB"), Some("4120"));
        assert_eq!(table.get("FR"), Some("4279"));
        assert_eq!(table.get("ZZ"), None);
    }

    #[test]
    fn hs2_names_parse() {
        let table = Hs2NameTable::from_reader(
            "HS2,HS2_Name\n85,Electrical machinery and equipment\n09,Coffee and tea\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(table.get("85"), Some("Electrical machinery and equipment"));
        assert_eq!(table.get("09"), Some("Coffee and tea"));
        assert_eq!(table.get("99"), None);
    }

    #[test]
    fn hs2_sections_parse() {
        let table = Hs2SectionTable::from_reader(
            "HS2_Code,Section,Section_Title\n85,XVI,Machinery and electrical equipment\n".as_bytes(),
        )
        .unwrap();
        let section = table.get("85").unwrap();
        assert_eq!(section.id, "XVI");
        assert_eq!(section.title, "Machinery and electrical equipment");
    }

    #[test]
    fn missing_columns_are_an_error() {
        assert!(CountryTable::from_reader("ISO,Code\nGB,4120\n".as_bytes()).is_err());
    }

    #[test]
    fn load_from_dir_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("country.csv"),
            "ISO Code,Code\nGB,4120\n",
        )
        .unwrap();

        let refdata = ReferenceData::load_from_dir(dir.path());
        assert_eq!(refdata.country_code("gb"), Some("4120"));
        assert!(refdata.hs2_names().is_none());
        assert!(refdata.hs2_sections().is_none());
    }
}
