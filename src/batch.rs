//! Batch outline extraction across many documents.
//!
//! Documents are independent: each gets its own ladder and its own copy of
//! the configuration, and one document failing never stops the others.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::ladder::{FallbackLadder, LadderOutcome, Strategy};
use crate::parser::OutlineConfig;
use crate::source::TextSource;

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Configuration cloned into every document's ladder
    pub config: OutlineConfig,
    /// Process documents on a rayon pool
    pub parallel: bool,
    /// Worker threads (0 = rayon default)
    pub threads: usize,
}

impl BatchOptions {
    /// Create batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the outline configuration.
    pub fn with_config(mut self, config: OutlineConfig) -> Self {
        self.config = config;
        self
    }

    /// Process documents one after another.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the number of worker threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            config: OutlineConfig::default(),
            parallel: true,
            threads: 0,
        }
    }
}

/// Outcome for one document of a batch.
#[derive(Debug)]
pub struct DocumentResult {
    /// Document name
    pub name: String,
    /// Ladder outcome, or the error that stopped the document
    pub result: Result<LadderOutcome>,
}

impl DocumentResult {
    /// Whether an outline was accepted for this document.
    pub fn is_success(&self) -> bool {
        matches!(&self.result, Ok(outcome) if outcome.is_accepted())
    }
}

/// Results of a batch run, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentResult>,
}

impl BatchReport {
    /// Number of documents processed.
    pub fn total(&self) -> usize {
        self.documents.len()
    }

    /// Documents with an accepted outline.
    pub fn succeeded(&self) -> usize {
        self.documents.iter().filter(|d| d.is_success()).count()
    }

    /// Documents without an accepted outline.
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// How many documents each strategy was accepted for.
    pub fn strategy_counts(&self) -> BTreeMap<Strategy, usize> {
        let mut counts = BTreeMap::new();
        for doc in &self.documents {
            if let Ok(outcome) = &doc.result {
                if let Some(strategy) = outcome.strategy() {
                    *counts.entry(strategy).or_insert(0) += 1;
                }
            }
        }
        counts
    }
}

/// Run the ladder over every source.
pub fn extract_batch<S: TextSource>(sources: &[S], options: &BatchOptions) -> Result<BatchReport> {
    extract_batch_with_progress(sources, options, |_| {})
}

/// Run the ladder over every source, calling `on_done` as each document
/// finishes.
///
/// `on_done` may be called from several threads at once.
pub fn extract_batch_with_progress<S, F>(
    sources: &[S],
    options: &BatchOptions,
    on_done: F,
) -> Result<BatchReport>
where
    S: TextSource,
    F: Fn(&DocumentResult) + Sync,
{
    let process = |source: &S| {
        let ladder = FallbackLadder::with_config(options.config.clone());
        let result = DocumentResult {
            name: source.name(),
            result: ladder.run(source),
        };
        if let Err(e) = &result.result {
            log::warn!("{}: {}", result.name, e);
        }
        on_done(&result);
        result
    };

    let documents = if options.parallel {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if options.threads > 0 {
            builder = builder.num_threads(options.threads);
        }
        let pool = builder
            .build()
            .map_err(|e| Error::Other(format!("thread pool: {}", e)))?;
        pool.install(|| sources.par_iter().map(process).collect())
    } else {
        sources.iter().map(process).collect()
    };

    Ok(BatchReport { documents })
}
