//! # cbscreen Ext File
//!
//! File adapters for the cbscreen screening pipeline:
//! - CSV export to [`RawTable`](cbscreen_core::RawTable)
//! - Base-info CSV to the set of unlisted bond codes
//! - Directories of dated `conv_YYYYMMDD.csv` snapshots
//! - Premium-rate history across those snapshots
//!
//! All reads are blocking. Enable the `parallel` feature to read history
//! files on the rayon pool.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod directory;
mod error;
mod history;
mod table;

pub use directory::{load_file, SnapshotDirectory, SnapshotFile};
pub use error::{FileError, FileResult};
pub use history::load_premium_history;
pub use table::{
    load_unlisted, read_table, read_table_from, BASE_INFO_CODE_COLUMN, BASE_INFO_LISTING_COLUMN,
};
