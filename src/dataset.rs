//! Known-suburb extraction from the reference dataset.
//!
//! The dataset is the cleaned training CSV. Only its `Suburb` column is
//! read; every other column is ignored.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use crate::error::DatasetLoadError;

/// Column holding suburb names.
pub const SUBURB_COLUMN: &str = "Suburb";

/// Suburb the form preselects when the dataset has it.
pub const DEFAULT_SUBURB: &str = "Richmond";

/// Cell values treated as missing, matching the usual dataframe NA tokens.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

/// Sorted, de-duplicated suburb names observed in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KnownSuburbs {
    names: Vec<String>,
}

impl KnownSuburbs {
    /// Read the `Suburb` column of the CSV file at `path`.
    pub fn load(path: &Path) -> Result<Self, DatasetLoadError> {
        let file = std::fs::File::open(path).map_err(|source| DatasetLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let suburbs = Self::from_reader(file)?;
        tracing::debug!(
            "Loaded {} known suburbs from {}",
            suburbs.len(),
            path.display()
        );
        Ok(suburbs)
    }

    /// Read the `Suburb` column from CSV data with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetLoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let index = rdr
            .headers()?
            .iter()
            .position(|h| h.trim() == SUBURB_COLUMN)
            .ok_or_else(|| DatasetLoadError::MissingColumn(SUBURB_COLUMN.to_string()))?;

        let mut names = BTreeSet::new();
        for record in rdr.records() {
            let record = record?;
            match record.get(index) {
                Some(value) if !is_missing(value) => {
                    names.insert(value.to_string());
                }
                _ => {}
            }
        }

        if names.is_empty() {
            return Err(DatasetLoadError::NoValues(SUBURB_COLUMN.to_string()));
        }

        Ok(Self {
            names: names.into_iter().collect(),
        })
    }

    /// Build a set directly from names, dropping missing values and duplicates.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = values
            .into_iter()
            .map(|value| -> String { value.into() })
            .filter(|name| !is_missing(name))
            .collect();
        Self {
            names: names.into_iter().collect(),
        }
    }

    pub fn contains(&self, suburb: &str) -> bool {
        self.names
            .binary_search_by(|name| name.as_str().cmp(suburb))
            .is_ok()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// [`DEFAULT_SUBURB`] when known, otherwise the first suburb alphabetically.
    pub fn default_selection(&self) -> Option<&str> {
        if self.contains(DEFAULT_SUBURB) {
            Some(DEFAULT_SUBURB)
        } else {
            self.names.first().map(String::as_str)
        }
    }
}
