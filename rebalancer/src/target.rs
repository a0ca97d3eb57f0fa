//! Target allocation (portfolio.json) loading and validation.
//!
//! ```json
//! {
//!   "symbols": {
//!     "VCN.TO": { "percent": 0.3 },
//!     "XAW.TO": { "percent": 0.5 }
//!   }
//! }
//! ```
//!
//! Percents are fractions of total assets (positions + buying power). They
//! may sum to less than 1; the remainder stays in cash.

use std::collections::BTreeMap;
use std::path::Path;

use log::warn;
use qtbalance::Symbol;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Raw portfolio file contents.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioFile {
    pub symbols: BTreeMap<String, TargetEntry>,
}

/// One symbol's target.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TargetEntry {
    pub percent: f64,
}

/// Validated target allocation, ordered by symbol.
#[derive(Debug, Clone)]
pub struct TargetAllocation {
    targets: Vec<(Symbol, f64)>,
}

impl TargetAllocation {
    /// Load and validate a portfolio.json file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::TargetRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let file: PortfolioFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    /// Validate raw file contents.
    pub fn from_file(file: PortfolioFile) -> Result<Self> {
        let mut targets: Vec<(Symbol, f64)> = Vec::with_capacity(file.symbols.len());

        for (raw, entry) in file.symbols {
            let symbol = Symbol::parse(&raw)
                .map_err(|e| Error::Target(format!("bad symbol '{raw}': {e}")))?;
            if !entry.percent.is_finite() || entry.percent < 0.0 {
                return Err(Error::Target(format!(
                    "percent for {symbol} must be a non-negative number, got {}",
                    entry.percent
                )));
            }
            if targets.iter().any(|(s, _)| *s == symbol) {
                return Err(Error::Target(format!("duplicate symbol: {symbol}")));
            }
            targets.push((symbol, entry.percent));
        }
        targets.sort_by(|a, b| a.0.cmp(&b.0));

        let total: f64 = targets.iter().map(|(_, p)| p).sum();
        if total > 1.0 {
            return Err(Error::Allocation { total });
        }
        if targets.is_empty() {
            warn!("Portfolio has no symbols; every holding will be reported as unallocated");
        }

        Ok(Self { targets })
    }

    /// (symbol, fraction) pairs in symbol order.
    pub fn targets(&self) -> &[(Symbol, f64)] {
        &self.targets
    }

    /// Sum of all target fractions.
    pub fn total_percent(&self) -> f64 {
        self.targets.iter().map(|(_, p)| p).sum()
    }

    /// Fraction left in cash.
    pub fn cash_percent(&self) -> f64 {
        (1.0 - self.total_percent()).max(0.0)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_json() -> &'static str {
        r#"{
            "symbols": {
                "XAW.TO": { "percent": 0.40 },
                "VCN.TO": { "percent": 0.30 },
                "ZAG.TO": { "percent": 0.20 }
            }
        }"#
    }

    #[test]
    fn parse_valid_portfolio() {
        let alloc = TargetAllocation::from_json(valid_json()).unwrap();
        assert_eq!(alloc.len(), 3);
        // Sorted by symbol
        assert_eq!(alloc.targets()[0].0.as_str(), "VCN.TO");
        assert_eq!(alloc.targets()[0].1, 0.30);
        assert_eq!(alloc.targets()[2].0.as_str(), "ZAG.TO");
        assert_eq!(alloc.targets()[2].1, 0.20);
    }

    #[test]
    fn remainder_is_cash() {
        let alloc = TargetAllocation::from_json(valid_json()).unwrap();
        assert!((alloc.total_percent() - 0.90).abs() < 1e-12);
        assert!((alloc.cash_percent() - 0.10).abs() < 1e-12);
    }

    #[test]
    fn exactly_one_is_accepted() {
        let json = r#"{"symbols": {"A": {"percent": 0.1}, "B": {"percent": 0.2}, "C": {"percent": 0.7}}}"#;
        let alloc = TargetAllocation::from_json(json).unwrap();
        assert_eq!(alloc.len(), 3);
        assert_eq!(alloc.cash_percent(), 0.0);
    }

    #[test]
    fn reject_sum_over_one() {
        let json = r#"{"symbols": {"A": {"percent": 0.6}, "B": {"percent": 0.5}}}"#;
        match TargetAllocation::from_json(json) {
            Err(Error::Allocation { total }) => assert!((total - 1.1).abs() < 1e-12),
            other => panic!("expected Allocation error, got {other:?}"),
        }
    }

    #[test]
    fn reject_sum_just_over_one() {
        let json = r#"{"symbols": {"A": {"percent": 0.6}, "B": {"percent": 0.4000000005}}}"#;
        assert!(matches!(
            TargetAllocation::from_json(json),
            Err(Error::Allocation { .. })
        ));
    }

    #[test]
    fn reject_single_percent_over_one() {
        let json = r#"{"symbols": {"A": {"percent": 1.5}}}"#;
        assert!(matches!(
            TargetAllocation::from_json(json),
            Err(Error::Allocation { .. })
        ));
    }

    #[test]
    fn reject_negative_percent() {
        let json = r#"{"symbols": {"A": {"percent": -0.1}}}"#;
        assert!(matches!(
            TargetAllocation::from_json(json),
            Err(Error::Target(_))
        ));
    }

    #[test]
    fn reject_bad_symbol() {
        let json = r#"{"symbols": {"": {"percent": 0.1}}}"#;
        assert!(matches!(
            TargetAllocation::from_json(json),
            Err(Error::Target(_))
        ));
    }

    #[test]
    fn reject_symbols_equal_after_trim() {
        let json = r#"{"symbols": {"A": {"percent": 0.1}, " A": {"percent": 0.1}}}"#;
        assert!(matches!(
            TargetAllocation::from_json(json),
            Err(Error::Target(_))
        ));
    }

    #[test]
    fn reject_missing_percent() {
        let json = r#"{"symbols": {"A": {"pct": 0.1}}}"#;
        assert!(matches!(
            TargetAllocation::from_json(json),
            Err(Error::TargetParse(_))
        ));
    }

    #[test]
    fn empty_portfolio_is_allowed() {
        let alloc = TargetAllocation::from_json(r#"{"symbols": {}}"#).unwrap();
        assert!(alloc.is_empty());
        assert_eq!(alloc.cash_percent(), 1.0);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        std::fs::write(&path, valid_json()).unwrap();

        let alloc = TargetAllocation::load(&path).unwrap();
        assert_eq!(alloc.len(), 3);
    }

    #[test]
    fn load_demo_portfolio() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/portfolio.json");
        let alloc = TargetAllocation::load(&path).unwrap();
        assert_eq!(alloc.len(), 3);
        assert!((alloc.cash_percent() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn load_missing_file() {
        let err = TargetAllocation::load(Path::new("/nonexistent/portfolio.json")).unwrap_err();
        assert!(matches!(err, Error::TargetRead { .. }));
    }
}
