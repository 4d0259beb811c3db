//! # cbscreen Core
//!
//! Core types for the cbscreen convertible bond screening toolkit.
//!
//! This crate provides the building blocks used throughout cbscreen:
//!
//! - **Types**: `Date`, `CreditRating`, `BondRecord`, `Snapshot`
//! - **Raw tables**: [`RawTable`], the header-indexed string table that file
//!   adapters produce and the loader consumes
//! - **Cell parsing**: lenient number and date parsing for upstream CSV exports
//!
//! ## Design Philosophy
//!
//! - **Immutability**: a `Snapshot` never changes after construction; every
//!   filter returns a new one
//! - **Derived values are computed**: double-low score and conversion value
//!   are methods, never stored fields
//! - **No I/O**: reading files belongs to `cbscreen-ext-file`
//!
//! ## Example
//!
//! ```rust
//! use cbscreen_core::prelude::*;
//!
//! let maturity = Date::from_ymd(2029, 6, 30).unwrap();
//! let bond = BondRecord::new("113001", 112.0, 9.5, 10.0, 17.9, maturity, "Acme Tech");
//! assert!((bond.double_low_score() - 129.9).abs() < 1e-9);
//! assert!((bond.conversion_value() - 95.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod parse;
pub mod table;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::table::RawTable;
    pub use crate::types::{BondRecord, CreditRating, Date, Snapshot};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use table::RawTable;
pub use types::{BondRecord, CreditRating, Date, Snapshot};
