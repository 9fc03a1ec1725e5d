//! The instrument universe and its category map.
//!
//! The universe is a fixed, ordered list of sector tickers plus two category
//! lists (defensive and cyclical) used by the tilt and risk-state rules.
//! Tickers outside both lists are unclassified for tilt purposes.

use serde::{Deserialize, Serialize};

use super::settings::ConfigError;

/// Category tag for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Defensive,
    Cyclical,
    Unclassified,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Defensive => "Defensive",
            Self::Cyclical => "Cyclical",
            Self::Unclassified => "Unclassified",
        }
    }
}

/// One instrument with its resolved category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub ticker: String,
    pub category: Category,
}

/// The classification universe.
///
/// Order matters: ranking ties break on position in `tickers`, and the
/// engine emits rows in this order before ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    /// All tickers, in input order.
    pub tickers: Vec<String>,

    /// Tickers counted as defensive for tilt and risk-state rules.
    pub defensive: Vec<String>,

    /// Tickers counted as cyclical for tilt and risk-state rules.
    pub cyclical: Vec<String>,
}

impl Default for Universe {
    fn default() -> Self {
        Self {
            tickers: [
                "XLB", "XLE", "XLF", "XLI", "XLK", "XLP", "XLU", "XLV", "XLY",
                "XLC", "XLRE",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            defensive: ["XLP", "XLU", "XLV"].iter().map(|s| s.to_string()).collect(),
            cyclical: ["XLF", "XLI", "XLB", "XLY", "XLK"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Universe {
    /// Number of instruments.
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.tickers.iter().any(|t| t == ticker)
    }

    /// Resolve the category for a ticker.
    pub fn category_of(&self, ticker: &str) -> Category {
        if self.defensive.iter().any(|t| t == ticker) {
            Category::Defensive
        } else if self.cyclical.iter().any(|t| t == ticker) {
            Category::Cyclical
        } else {
            Category::Unclassified
        }
    }

    /// The universe as resolved instruments, in input order.
    pub fn instruments(&self) -> Vec<Instrument> {
        self.tickers
            .iter()
            .map(|t| Instrument {
                ticker: t.clone(),
                category: self.category_of(t),
            })
            .collect()
    }

    /// Check internal consistency.
    ///
    /// The universe must be non-empty, free of duplicate tickers, and every
    /// category list entry must name a universe ticker.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::EmptyUniverse);
        }

        for (i, ticker) in self.tickers.iter().enumerate() {
            if self.tickers[..i].contains(ticker) {
                return Err(ConfigError::DuplicateTicker(ticker.clone()));
            }
        }

        for ticker in self.defensive.iter().chain(self.cyclical.iter()) {
            if !self.contains(ticker) {
                return Err(ConfigError::UnknownTicker(ticker.clone()));
            }
        }

        for ticker in &self.defensive {
            if self.cyclical.contains(ticker) {
                return Err(ConfigError::ConflictingCategory(ticker.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_universe() {
        let universe = Universe::default();
        assert_eq!(universe.len(), 11);
        assert!(universe.validate().is_ok());
        assert_eq!(universe.category_of("XLP"), Category::Defensive);
        assert_eq!(universe.category_of("XLK"), Category::Cyclical);
        assert_eq!(universe.category_of("XLE"), Category::Unclassified);
    }

    #[test]
    fn test_duplicate_ticker_rejected() {
        let mut universe = Universe::default();
        universe.tickers.push("XLB".to_string());
        assert!(matches!(
            universe.validate(),
            Err(ConfigError::DuplicateTicker(t)) if t == "XLB"
        ));
    }

    #[test]
    fn test_category_entry_must_be_in_universe() {
        let mut universe = Universe::default();
        universe.defensive.push("GLD".to_string());
        assert!(matches!(
            universe.validate(),
            Err(ConfigError::UnknownTicker(t)) if t == "GLD"
        ));
    }

    #[test]
    fn test_ticker_cannot_be_both_defensive_and_cyclical() {
        let mut universe = Universe::default();
        universe.cyclical.push("XLP".to_string());
        assert!(matches!(
            universe.validate(),
            Err(ConfigError::ConflictingCategory(t)) if t == "XLP"
        ));
    }

    #[test]
    fn test_instruments_preserve_order() {
        let universe = Universe::default();
        let instruments = universe.instruments();
        assert_eq!(instruments[0].ticker, "XLB");
        assert_eq!(instruments[0].category, Category::Cyclical);
        assert_eq!(instruments.last().unwrap().ticker, "XLRE");
    }
}
