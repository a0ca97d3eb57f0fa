//! Ticker symbols as the broker reports them (e.g. `XEQT.TO`).

use std::fmt;

use crate::error::ValidationError;

/// A non-empty ticker symbol without whitespace.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Symbol(Box<str>);

impl Symbol {
    /// Create a symbol.
    ///
    /// # Panics
    ///
    /// Panics if `s` is empty or contains whitespace. Use [`Symbol::try_new`]
    /// for untrusted input.
    #[track_caller]
    pub fn new(s: &str) -> Self {
        match Self::parse(s) {
            Ok(sym) => sym,
            Err(e) => panic!("invalid symbol: {e}"),
        }
    }

    /// Create a symbol, returning `None` if `s` is not a valid symbol.
    pub fn try_new(s: &str) -> Option<Self> {
        Self::parse(s).ok()
    }

    /// Surrounding whitespace is trimmed; inner whitespace is an error.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidSymbol(trimmed.to_string()));
        }
        Ok(Symbol(trimmed.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Honour width/alignment flags so symbols line up in tables.
        f.pad(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Symbol::parse(&s)
    }
}

impl From<Symbol> for String {
    fn from(sym: Symbol) -> String {
        sym.0.into()
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_as_str() {
        assert_eq!(Symbol::new("VFV.TO").as_str(), "VFV.TO");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(Symbol::new(" XEQT.TO\n").as_str(), "XEQT.TO");
    }

    #[test]
    fn rejects_empty_and_inner_whitespace() {
        assert_eq!(Symbol::parse(""), Err(ValidationError::EmptySymbol));
        assert_eq!(Symbol::parse("   "), Err(ValidationError::EmptySymbol));
        assert!(matches!(
            Symbol::parse("BRK B"),
            Err(ValidationError::InvalidSymbol(_))
        ));
        assert!(Symbol::try_new("").is_none());
    }

    #[test]
    #[should_panic(expected = "invalid symbol")]
    fn new_panics_on_empty() {
        let _ = Symbol::new("");
    }

    #[test]
    fn display_pads() {
        assert_eq!(format!("{:8}|", Symbol::new("VCN.TO")), "VCN.TO  |");
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut syms = vec![Symbol::new("ZAG.TO"), Symbol::new("VCN.TO"), Symbol::new("XAW.TO")];
        syms.sort();
        assert_eq!(syms[0].as_str(), "VCN.TO");
        assert_eq!(syms[2].as_str(), "ZAG.TO");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_as_plain_string() {
        let sym: Symbol = serde_json::from_str("\"XAW.TO\"").unwrap();
        assert_eq!(sym.as_str(), "XAW.TO");
        assert_eq!(serde_json::to_string(&sym).unwrap(), "\"XAW.TO\"");
        assert!(serde_json::from_str::<Symbol>("\"\"").is_err());
    }
}
