//! Market-data boundary: where put chains come from
//!
//! The estimator never talks to a provider directly. A provider implements
//! [`OptionsChainSource`]; [`lookup_chain`] turns whatever it returns into a
//! [`ChainLookup`], so a failed or empty fetch becomes an explicit
//! `Unavailable` value instead of an error the caller has to catch.

use chrono::NaiveDate;
use csv::Reader;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{DataUnavailableError, ExportError};
use super::estimator::estimate_from_chain;
use super::types::{ComparisonOutcome, ExpirationComparison, HedgeRequest, OptionContract, OptionsChain};

/// Provider of listed expirations and put rows for a symbol.
///
/// `Ok(vec![])` means the provider answered with no data; `Err` means the
/// provider could not be reached or failed.
pub trait OptionsChainSource: Send + Sync {
    fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, DataUnavailableError>;

    fn puts(&self, symbol: &str, expiration: NaiveDate) -> Result<Vec<OptionContract>, DataUnavailableError>;
}

/// Which expiration to price against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Earliest listed expiration
    Nearest,
    On(NaiveDate),
}

/// Result of asking for a chain
#[derive(Debug, Clone, PartialEq)]
pub enum ChainLookup {
    Available(OptionsChain),
    Unavailable(DataUnavailableError),
}

impl ChainLookup {
    pub fn is_available(&self) -> bool {
        matches!(self, ChainLookup::Available(_))
    }
}

/// Fetch one expiration's puts, reporting every failure as `DataUnavailableError`
pub fn fetch_chain(
    source: &dyn OptionsChainSource,
    symbol: &str,
    expiration: Expiration,
) -> Result<OptionsChain, DataUnavailableError> {
    let listed = source.expirations(symbol)?;

    let chosen = match expiration {
        Expiration::Nearest => listed.iter().min().copied().ok_or_else(|| {
            DataUnavailableError::NoExpirations { symbol: symbol.to_string() }
        })?,
        Expiration::On(date) => {
            if listed.is_empty() {
                return Err(DataUnavailableError::NoExpirations { symbol: symbol.to_string() });
            }
            if !listed.contains(&date) {
                return Err(DataUnavailableError::UnknownExpiration {
                    symbol: symbol.to_string(),
                    expiration: date.to_string(),
                });
            }
            date
        }
    };

    fetch_listed(source, symbol, chosen)
}

/// Puts for an expiration already known to be listed
fn fetch_listed(
    source: &dyn OptionsChainSource,
    symbol: &str,
    expiration: NaiveDate,
) -> Result<OptionsChain, DataUnavailableError> {
    let puts = source.puts(symbol, expiration)?;
    if puts.is_empty() {
        return Err(DataUnavailableError::EmptyChain {
            symbol: Some(symbol.to_string()),
            expiration: Some(expiration.to_string()),
        });
    }

    debug!("fetched {} puts for {} expiring {}", puts.len(), symbol, expiration);

    Ok(OptionsChain {
        symbol: symbol.to_string(),
        expiration,
        puts,
    })
}

/// Fetch a chain and fold any failure into `ChainLookup::Unavailable`
pub fn lookup_chain(source: &dyn OptionsChainSource, symbol: &str, expiration: Expiration) -> ChainLookup {
    match fetch_chain(source, symbol, expiration) {
        Ok(chain) => ChainLookup::Available(chain),
        Err(e) => {
            warn!("options chain lookup for {} failed: {}", symbol, e);
            ChainLookup::Unavailable(e)
        }
    }
}

/// Run the (blocking) lookup on tokio's blocking pool with a deadline
pub async fn lookup_chain_with_timeout(
    source: Arc<dyn OptionsChainSource>,
    symbol: String,
    expiration: Expiration,
    timeout: Duration,
) -> ChainLookup {
    let task = tokio::task::spawn_blocking(move || lookup_chain(source.as_ref(), &symbol, expiration));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(lookup)) => lookup,
        Ok(Err(join_error)) => ChainLookup::Unavailable(DataUnavailableError::Source(format!(
            "market data task failed: {}",
            join_error
        ))),
        Err(_) => {
            warn!("options chain lookup timed out after {:?}", timeout);
            ChainLookup::Unavailable(DataUnavailableError::Timeout(timeout.as_millis() as u64))
        }
    }
}

/// Price the hedge against every listed expiration.
///
/// The expiration list is fetched once; each date then costs one `puts` call.
/// Fails only when the expiration list itself cannot be obtained; a bad
/// individual expiration shows up as an `Unavailable` row.
pub fn compare_expirations(
    source: &dyn OptionsChainSource,
    symbol: &str,
    request: &HedgeRequest,
) -> Result<Vec<ExpirationComparison>, DataUnavailableError> {
    let mut listed = source.expirations(symbol)?;
    if listed.is_empty() {
        return Err(DataUnavailableError::NoExpirations { symbol: symbol.to_string() });
    }
    listed.sort();
    listed.dedup();

    let rows = listed
        .into_iter()
        .map(|expiration| {
            let outcome = fetch_listed(source, symbol, expiration)
                .and_then(|chain| estimate_from_chain(request, &chain));
            ExpirationComparison {
                expiration,
                outcome: match outcome {
                    Ok(result) => ComparisonOutcome::Estimated(result),
                    Err(e) => ComparisonOutcome::Unavailable { reason: e.to_string() },
                },
            }
        })
        .collect();

    Ok(rows)
}

/// In-memory chain data keyed by symbol and expiration
#[derive(Debug, Clone, Default)]
pub struct StaticChainSource {
    chains: HashMap<String, BTreeMap<NaiveDate, Vec<OptionContract>>>,
}

impl StaticChainSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add puts for one expiration (appends if the expiration already exists)
    pub fn insert(&mut self, symbol: &str, expiration: NaiveDate, puts: Vec<OptionContract>) {
        self.chains
            .entry(normalize_symbol(symbol))
            .or_default()
            .entry(expiration)
            .or_default()
            .extend(puts);
    }

    /// List an expiration with no puts
    pub fn insert_empty(&mut self, symbol: &str, expiration: NaiveDate) {
        self.insert(symbol, expiration, Vec::new());
    }

    pub fn with_chain(mut self, symbol: &str, expiration: NaiveDate, puts: Vec<OptionContract>) -> Self {
        self.insert(symbol, expiration, puts);
        self
    }

    /// Load from CSV with columns `symbol,expiration,strike,lastPrice`
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, ExportError> {
        let mut csv_reader = Reader::from_reader(reader);
        let mut source = Self::new();

        for result in csv_reader.deserialize() {
            let row: ChainCsvRow = result?;
            source.insert(&row.symbol, row.expiration, vec![OptionContract::new(row.strike, row.last_price)]);
        }

        Ok(source)
    }
}

impl OptionsChainSource for StaticChainSource {
    fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, DataUnavailableError> {
        Ok(self
            .chains
            .get(&normalize_symbol(symbol))
            .map(|by_date| by_date.keys().copied().collect())
            .unwrap_or_default())
    }

    fn puts(&self, symbol: &str, expiration: NaiveDate) -> Result<Vec<OptionContract>, DataUnavailableError> {
        Ok(self
            .chains
            .get(&normalize_symbol(symbol))
            .and_then(|by_date| by_date.get(&expiration))
            .cloned()
            .unwrap_or_default())
    }
}

/// Chain data read from a CSV file on every request
#[derive(Debug, Clone)]
pub struct CsvChainSource {
    path: PathBuf,
}

impl CsvChainSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    fn load(&self) -> Result<StaticChainSource, DataUnavailableError> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            DataUnavailableError::Source(format!("{}: {}", self.path.display(), e))
        })?;
        StaticChainSource::from_csv_reader(file)
            .map_err(|e| DataUnavailableError::Source(format!("{}: {}", self.path.display(), e)))
    }
}

impl OptionsChainSource for CsvChainSource {
    fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, DataUnavailableError> {
        self.load()?.expirations(symbol)
    }

    fn puts(&self, symbol: &str, expiration: NaiveDate) -> Result<Vec<OptionContract>, DataUnavailableError> {
        self.load()?.puts(symbol, expiration)
    }
}

#[derive(Debug, serde::Deserialize)]
struct ChainCsvRow {
    symbol: String,
    expiration: NaiveDate,
    strike: f64,
    #[serde(rename = "lastPrice")]
    last_price: f64,
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}
