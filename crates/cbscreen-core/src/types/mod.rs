//! Domain types for convertible bond screening.

mod bond;
mod date;
mod rating;
mod snapshot;

pub use bond::BondRecord;
pub use date::Date;
pub use rating::CreditRating;
pub use snapshot::Snapshot;
