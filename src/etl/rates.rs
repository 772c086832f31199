//! Exchange rate table loaded from a `Currency,Rate` CSV file.

use crate::core::RateLoadError;
use csv::{ReaderBuilder, Trim};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Multiplicative conversion factors from USD, keyed by currency code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Reads a CSV with a header row followed by `code,rate` rows.
    ///
    /// A code repeated with the same rate is accepted; a conflicting repeat fails.
    pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Self, RateLoadError> {
        let unreadable = |reason: String| RateLoadError::Unreadable {
            origin: origin.to_string(),
            reason,
        };

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut rates = BTreeMap::new();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| unreadable(e.to_string()))?;
            let line = record.position().map_or(index as u64 + 2, |p| p.line());
            if record.iter().all(str::is_empty) {
                continue;
            }

            let (Some(code), Some(raw_rate)) = (record.get(0), record.get(1)) else {
                return Err(unreadable(format!("line {line} has fewer than two columns")));
            };
            let code = code.to_uppercase();
            if code.is_empty() {
                return Err(unreadable(format!("line {line} has an empty currency code")));
            }

            let rate: f64 = raw_rate
                .parse()
                .map_err(|_| unreadable(format!("line {line} has an invalid rate '{raw_rate}'")))?;
            if !rate.is_finite() || rate <= 0.0 {
                return Err(unreadable(format!(
                    "line {line} has a non-positive rate '{raw_rate}'"
                )));
            }

            match rates.get(&code) {
                Some(&first) if first != rate => {
                    return Err(RateLoadError::DuplicateCode {
                        code,
                        first,
                        second: rate,
                    });
                }
                Some(_) => debug!("Ignoring repeated rate for {}", code),
                None => {
                    rates.insert(code, rate);
                }
            }
        }

        debug!("Loaded {} exchange rates from {}", rates.len(), origin);
        Ok(RateTable { rates })
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        RateTable {
            rates: iter.into_iter().map(|(code, rate)| (code.into(), rate)).collect(),
        }
    }
}

/// Loads the rate table from a CSV file on disk.
pub fn load_rates<P: AsRef<Path>>(path: P) -> Result<RateTable, RateLoadError> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|e| RateLoadError::Unreadable {
        origin: origin.clone(),
        reason: e.to_string(),
    })?;
    RateTable::from_reader(file, &origin)
}
