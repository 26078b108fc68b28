//! Tab-driven reporting pipeline for the civil registry submission sheets.
//!
//! A static registry maps tab names to remote CSV exports. The loader fetches
//! and caches each tab as a text-only [`table::Table`], the filter and
//! compliance modules shape the data per user selection, and the export
//! module serializes the displayed view back to downloadable CSV bytes. The
//! presentation layer and the remote spreadsheet service sit outside this
//! crate; the binary in `main.rs` is the minimal consumer.

pub mod compliance;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod load;
pub mod session;
pub mod sources;
pub mod table;

pub use error::PipelineError;
pub use table::Table;
