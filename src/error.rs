//! Validation errors for core value construction.

/// Errors returned when a core value cannot be built from raw input.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationError {
    /// Symbols must contain at least one non-whitespace character.
    #[error("symbol must not be empty")]
    EmptySymbol,
    /// Symbols must not contain whitespace.
    #[error("symbol '{0}' contains whitespace")]
    InvalidSymbol(String),
    /// Money amounts must be finite.
    #[error("amount {0} is not a finite number")]
    NonFiniteAmount(f64),
    /// Money amounts must fit the fixed-point range.
    #[error("amount {0} is out of range")]
    AmountOutOfRange(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            format!("{}", ValidationError::EmptySymbol),
            "symbol must not be empty"
        );
        assert_eq!(
            format!("{}", ValidationError::InvalidSymbol("A B".into())),
            "symbol 'A B' contains whitespace"
        );
    }

    #[test]
    fn is_error() {
        let err: Box<dyn std::error::Error> = Box::new(ValidationError::NonFiniteAmount(f64::NAN));
        assert!(err.to_string().contains("finite"));
    }
}
