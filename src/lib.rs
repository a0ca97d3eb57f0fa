// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! # qtbalance
//!
//! Core value types shared by the qtbalance broker client and rebalancer.
//!
//! ## Money Representation
//!
//! Money is stored as [`i64`] cents so that value comparisons and share
//! divisions are exact:
//!
//! ```
//! use qtbalance::Price;
//!
//! let price = Price(60_17); // $60.17
//! assert_eq!(format!("{}", price), "$60.17");
//! assert_eq!(Price::from_dollars(60.17).unwrap(), price);
//! ```
//!
//! Share prices keep six decimals, and share counts truncate toward zero:
//!
//! ```
//! use qtbalance::SharePrice;
//!
//! let price = SharePrice::from_dollars(0.455).unwrap();
//! assert_eq!(format!("{}", price), "$0.455");
//! // $100 buys 219 shares (219.78 truncated)
//! assert_eq!(price.shares_for(100.0), 219);
//! ```
//!
//! ## Symbols
//!
//! ```
//! use qtbalance::Symbol;
//!
//! let sym = Symbol::new("XEQT.TO");
//! assert_eq!(sym.as_str(), "XEQT.TO");
//! assert!(Symbol::try_new("  ").is_none());
//! ```

mod error;
mod side;
mod symbol;
mod types;

pub use error::ValidationError;
pub use side::Side;
pub use symbol::Symbol;
pub use types::{Price, Quantity, SharePrice};
