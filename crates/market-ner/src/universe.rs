//! Ticker allow-list
//!
//! A [`TickerUniverse`] is the closed set of symbols the extractor may
//! return, plus the market suffix every returned ticker carries. It is a
//! versioned artifact that can be loaded from JSON:
//!
//! ```json
//! { "version": "nifty50-2024", "suffix": ".NS", "symbols": ["RELIANCE", "TCS"] }
//! ```

use crate::error::{NerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const NIFTY50_VERSION: &str = "nifty50-2024";
const NSE_SUFFIX: &str = ".NS";

const NIFTY50_SYMBOLS: [&str; 50] = [
    "ADANIENT", "ADANIPORTS", "APOLLOHOSP", "ASIANPAINT", "AXISBANK",
    "BAJAJ-AUTO", "BAJFINANCE", "BAJAJFINSV", "BPCL", "BHARTIARTL",
    "BRITANNIA", "CIPLA", "COALINDIA", "DIVISLAB", "DRREDDY",
    "EICHERMOT", "GRASIM", "HCLTECH", "HDFCBANK", "HDFCLIFE",
    "HEROMOTOCO", "HINDALCO", "HINDUNILVR", "ICICIBANK", "ITC",
    "INDUSINDBK", "INFY", "JSWSTEEL", "KOTAKBANK", "LT",
    "LTIM", "M&M", "MARUTI", "NESTLEIND", "NTPC",
    "ONGC", "POWERGRID", "RELIANCE", "SBILIFE", "SBIN",
    "SUNPHARMA", "TATACONSUM", "TATAMOTORS", "TATASTEEL", "TCS",
    "TECHM", "TITAN", "ULTRACEMCO", "UPL", "WIPRO",
];

/// On-disk shape of a universe, validated into [`TickerUniverse`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UniverseFile {
    version: String,
    suffix: String,
    symbols: Vec<String>,
}

/// Closed set of tradable symbols sharing one market suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UniverseFile", into = "UniverseFile")]
pub struct TickerUniverse {
    version: String,
    suffix: String,
    symbols: Vec<String>,
    index: HashSet<String>,
}

impl TickerUniverse {
    /// Build a universe from bare symbols (without the suffix)
    ///
    /// Symbols and suffix are upper-cased. Fails on an empty suffix, an
    /// empty list, blank or duplicate symbols, or symbols that already carry
    /// the suffix.
    pub fn new<I, S>(version: impl Into<String>, suffix: impl Into<String>, symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffix = suffix.into().trim().to_ascii_uppercase();
        if suffix.is_empty() {
            return Err(NerError::Config("ticker suffix must not be empty".to_string()));
        }

        let mut ordered = Vec::new();
        let mut index = HashSet::new();
        for symbol in symbols {
            let symbol = symbol.as_ref().trim().to_ascii_uppercase();
            if symbol.is_empty() {
                return Err(NerError::Config("blank ticker symbol".to_string()));
            }
            if symbol.ends_with(&suffix) {
                return Err(NerError::Config(format!(
                    "symbol {symbol} must be listed without the {suffix} suffix"
                )));
            }
            if !index.insert(symbol.clone()) {
                return Err(NerError::Config(format!("duplicate ticker symbol {symbol}")));
            }
            ordered.push(symbol);
        }

        if ordered.is_empty() {
            return Err(NerError::Config("ticker universe has no symbols".to_string()));
        }

        Ok(Self {
            version: version.into(),
            suffix,
            symbols: ordered,
            index,
        })
    }

    /// The NIFTY 50 constituents on the National Stock Exchange of India
    pub fn nifty50() -> Self {
        Self {
            version: NIFTY50_VERSION.to_string(),
            suffix: NSE_SUFFIX.to_string(),
            symbols: NIFTY50_SYMBOLS.iter().map(ToString::to_string).collect(),
            index: NIFTY50_SYMBOLS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Parse a universe from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a universe from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Version label of this allow-list
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Market suffix, e.g. `.NS`
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a validated universe
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Bare symbols in listing order
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    /// Attach the market suffix to a bare symbol
    pub fn qualify(&self, symbol: &str) -> String {
        format!("{symbol}{}", self.suffix)
    }

    /// All suffix-qualified tickers in listing order
    pub fn qualified_symbols(&self) -> Vec<String> {
        self.symbols.iter().map(|s| self.qualify(s)).collect()
    }

    /// Whether `ticker` is an exact suffix-qualified member
    pub fn contains(&self, ticker: &str) -> bool {
        ticker
            .strip_suffix(self.suffix.as_str())
            .is_some_and(|base| self.index.contains(base))
    }

    /// Map a model-produced ticker onto the allow-list
    ///
    /// Accepts the qualified form or the bare symbol, in any case, with
    /// surrounding whitespace. Returns the qualified ticker, or `None` when
    /// the symbol is not listed.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let upper = raw.trim().to_ascii_uppercase();
        let base = upper.strip_suffix(self.suffix.as_str()).unwrap_or(&upper);
        self.index.contains(base).then(|| self.qualify(base))
    }
}

impl Default for TickerUniverse {
    fn default() -> Self {
        Self::nifty50()
    }
}

impl TryFrom<UniverseFile> for TickerUniverse {
    type Error = NerError;

    fn try_from(file: UniverseFile) -> Result<Self> {
        Self::new(file.version, file.suffix, file.symbols)
    }
}

impl From<TickerUniverse> for UniverseFile {
    fn from(universe: TickerUniverse) -> Self {
        Self {
            version: universe.version,
            suffix: universe.suffix,
            symbols: universe.symbols,
        }
    }
}
