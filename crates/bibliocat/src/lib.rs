//! # bibliocat
//!
//! Maintenance tool for a library catalog stored in SQLite: authors, works,
//! physical copies and loans.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bibliocat::{validate, Catalog, Config, Result};
//!
//! fn main() -> Result<()> {
//!     let config = Config::new("bibliotheque.db".into(), false)?;
//!     let catalog = Catalog::connect(&config)?;
//!
//!     let year = validate::parse_year("year", "1900")?;
//!     for work in catalog.works_before(year)? {
//!         println!("{} {} {}", work.id, work.year, work.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Deletions cascade by hand, children before parents: loans before copies,
//! copies and authorship links before works.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod validate;

pub use cli::{Menu, OutputFormat, OutputWriter};
pub use config::{Config, WorkDeletion};
pub use db::Catalog;
pub use error::Error;
pub use import::{import_sql, import_sql_file};
pub use models::*;

/// Result type for bibliocat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Catalog schema with a small sample data set.
pub const SAMPLE_SCHEMA: &str = include_str!("../sql/bibliotheque.sql");
