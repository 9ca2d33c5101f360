//! Error types shared by the simulator, the hedge estimator and the export layer

use thiserror::Error;

/// Invalid simulation or hedge input. Reported before any calculation runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("reinvestment price must be positive and finite, got {0}")]
    NonPositiveReinvestmentPrice(f64),

    #[error("simulation period must be at least one month")]
    ZeroPeriods,

    #[error("{field} must be within [0, 100], got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be non-negative and finite, got {value}")]
    NegativeValue { field: &'static str, value: f64 },

    #[error("{field} must be a finite number, got {value}")]
    NonFiniteValue { field: &'static str, value: f64 },

    /// Only raised by the strict simulation entry point
    #[error("share count fell below zero in month {month} ({total_shares:.4} shares)")]
    NegativeShares { month: u32, total_shares: f64 },
}

/// Options data could not be obtained or was empty.
///
/// Callers recover by falling back to the simplified hedge estimate or by
/// surfacing the message to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataUnavailableError {
    #[error("no option expirations listed for {symbol}")]
    NoExpirations { symbol: String },

    #[error("expiration {expiration} is not listed for {symbol}")]
    UnknownExpiration { symbol: String, expiration: String },

    #[error("no put contracts available{}", context_suffix(.symbol, .expiration))]
    EmptyChain {
        symbol: Option<String>,
        expiration: Option<String>,
    },

    #[error("market data source failed: {0}")]
    Source(String),

    #[error("market data request timed out after {0} ms")]
    Timeout(u64),
}

fn context_suffix(symbol: &Option<String>, expiration: &Option<String>) -> String {
    match (symbol, expiration) {
        (Some(s), Some(e)) => format!(" for {} expiring {}", s, e),
        (Some(s), None) => format!(" for {}", s),
        (None, Some(e)) => format!(" expiring {}", e),
        (None, None) => String::new(),
    }
}

/// Failures while reading or writing tabular files
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
