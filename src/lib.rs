//! Heritage Scraper - Hebrew Wikipedia and Yizkor pages to CSV
//!
//! This crate extracts the human-written text of two families of pages,
//! encyclopedia articles and memorial biographies, and appends one record per
//! page to an append-only CSV store.
//!
//! # Architecture
//!
//! ```text
//! URL ──▶ Site Classifier ──▶ Fetcher ──▶ Extractor (per family)
//!                                              │
//!                                              ▼
//!                          Record Sink ◀── Normalized Record
//!                               │
//!                               ▼
//!                      heritage_import.csv
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use heritage_scraper::{CsvFileSink, HttpFetcher, Pipeline, ScraperConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScraperConfig::from_env()?;
//!     let sink = CsvFileSink::new(config.csv_path.clone());
//!     let mut pipeline = Pipeline::new(HttpFetcher::new(config)?, sink);
//!
//!     let outcome = pipeline
//!         .process_url("https://he.wikipedia.org/wiki/מבצע_יונתן")
//!         .await;
//!     println!("{}", outcome);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod document;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod metrics;
pub mod pipeline;
pub mod record;
pub mod sink;
pub mod site;
pub mod text;

// Re-exports for convenience
pub use config::ScraperConfig;
pub use document::ParsedDocument;
pub use error::{Error, Result, SkipReason};
pub use extraction::{extract_encyclopedia, extract_memorial};
pub use fetch::{DocumentSource, HttpFetcher};
pub use pipeline::{BatchSummary, Extractor, Outcome, Pipeline, Status};
pub use record::{Record, CSV_HEADERS};
pub use sink::{CsvFileSink, MemorySink, RecordSink};
pub use site::{classify, SiteFamily};
pub use text::normalize;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
