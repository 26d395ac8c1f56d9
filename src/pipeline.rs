//! Per-URL orchestration
//!
//! ```text
//! URL ──▶ classify ──▶ fetch ──▶ extract ──▶ validate ──▶ append
//!            │           │          │            │           │
//!            └───────────┴──────────┴────────────┴───────────┴──▶ Skipped(reason)
//! ```
//!
//! Every URL yields exactly one [`Outcome`]. Nothing escapes the per-URL
//! boundary, so one bad page never aborts a batch. URLs are processed one
//! at a time, in input order, and nothing is retried here.

use crate::document::ParsedDocument;
use crate::error::SkipReason;
use crate::extraction;
use crate::fetch::DocumentSource;
use crate::metrics::Metrics;
use crate::record::Record;
use crate::sink::RecordSink;
use crate::site::{classify, SiteFamily};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Coarse result of processing one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Record written
    Ok,
    /// Nothing written
    Skip,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => f.write_str("OK"),
            Status::Skip => f.write_str("SKIP"),
        }
    }
}

/// Final state of one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Record appended to the store
    Written {
        /// Category of the written record
        category: String,
        /// Title of the written record
        title: String,
    },
    /// URL dropped
    Skipped {
        /// Why nothing was written
        reason: SkipReason,
        /// The URL as given
        url: String,
    },
}

impl Outcome {
    fn skipped(reason: SkipReason, url: &str) -> Self {
        Outcome::Skipped {
            reason,
            url: url.to_string(),
        }
    }

    /// OK or SKIP
    pub fn status(&self) -> Status {
        match self {
            Outcome::Written { .. } => Status::Ok,
            Outcome::Skipped { .. } => Status::Skip,
        }
    }

    /// Whether a record was written
    pub fn is_ok(&self) -> bool {
        self.status() == Status::Ok
    }

    /// `(status, category or reason, title or url)`
    pub fn triple(&self) -> (Status, String, String) {
        match self {
            Outcome::Written { category, title } => (Status::Ok, category.clone(), title.clone()),
            Outcome::Skipped { reason, url } => (Status::Skip, reason.to_string(), url.clone()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (status, middle, last) = self.triple();
        write!(f, "{} | {} | {}", status, middle, last)
    }
}

/// Outcomes of a batch, in input order
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// One outcome per input URL
    pub outcomes: Vec<Outcome>,
}

impl BatchSummary {
    /// URLs processed
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// URLs whose record was written
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }
}

/// Signature of a family-dispatching extractor
pub type Extractor = fn(SiteFamily, &mut ParsedDocument) -> Option<Record>;

/// Classification, fetch, extraction and storage for a stream of URLs
pub struct Pipeline<F, S> {
    source: F,
    sink: S,
    extractor: Extractor,
    metrics: Metrics,
}

impl<F: DocumentSource, S: RecordSink> Pipeline<F, S> {
    /// Create a pipeline over a page source and a record sink
    pub fn new(source: F, sink: S) -> Self {
        Self {
            source,
            sink,
            extractor: extraction::extract,
            metrics: Metrics::new(),
        }
    }

    /// Replace the extractor run on fetched pages
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// The page source
    pub fn source(&self) -> &F {
        &self.source
    }

    /// The record sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Counters for this pipeline's run
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Process one URL to completion
    #[instrument(skip(self))]
    pub async fn process_url(&mut self, url: &str) -> Outcome {
        let start = Instant::now();

        let family = classify(url);
        let outcome = if family == SiteFamily::Unknown {
            Outcome::skipped(SkipReason::UnknownDomain, url)
        } else {
            let document = self.source.fetch(url).await;
            self.process_document(url, family, document)
        };

        match &outcome {
            Outcome::Written { .. } => self.metrics.record_written(start.elapsed()),
            Outcome::Skipped { reason, .. } => {
                self.metrics.record_skip(&reason.to_string(), start.elapsed())
            }
        }
        outcome
    }

    /// Extract, validate and store an already fetched page.
    /// `None` stands for a failed fetch.
    pub fn process_document(
        &mut self,
        url: &str,
        family: SiteFamily,
        document: Option<ParsedDocument>,
    ) -> Outcome {
        let Some(mut document) = document else {
            return Outcome::skipped(SkipReason::NoDataExtracted, url);
        };

        let extractor = self.extractor;
        let extracted = catch_unwind(AssertUnwindSafe(|| extractor(family, &mut document)));
        let record = match extracted {
            Ok(Some(record)) => record,
            Ok(None) => return Outcome::skipped(SkipReason::NoDataExtracted, url),
            Err(_) => {
                error!("Error processing {}: extraction panicked", url);
                return Outcome::skipped(SkipReason::ProcessingError, url);
            }
        };

        self.store(url, record)
    }

    fn store(&mut self, url: &str, record: Record) -> Outcome {
        let missing = record.missing_fields();
        if !missing.is_empty() {
            warn!("Record for {} is missing {:?}", url, missing);
            return Outcome::skipped(SkipReason::MissingFields(missing), url);
        }

        if let Err(e) = self.sink.append(&record) {
            error!("Failed to write CSV row: {}", e);
            return Outcome::skipped(SkipReason::CsvWriteFailed, url);
        }

        info!("Stored '{}' ({})", record.title, record.category);
        Outcome::Written {
            category: record.category,
            title: record.title,
        }
    }

    /// Process URLs in order, handing each outcome to `on_outcome` as soon
    /// as it is known
    pub async fn run_batch<I, U, C>(&mut self, urls: I, mut on_outcome: C) -> BatchSummary
    where
        I: IntoIterator<Item = U>,
        U: AsRef<str>,
        C: FnMut(&str, &Outcome),
    {
        let mut summary = BatchSummary::default();
        for url in urls {
            let url = url.as_ref();
            let outcome = self.process_url(url).await;
            on_outcome(url, &outcome);
            summary.outcomes.push(outcome);
        }
        info!(
            "Batch complete: {}/{} written",
            summary.success_count(),
            summary.total()
        );
        summary
    }
}
