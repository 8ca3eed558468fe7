//! Policy knobs for the pagination engine
//!
//! Both structs are plain immutable values. Constructors of the engine call
//! `validate` so misconfiguration fails at construction rather than at the
//! first page load.

use color_eyre::eyre::{bail, Result};
use serde::Deserialize;

/// Upper bound for automatic retries of a single page
pub const MAX_RETRY_COUNT: usize = 10;

pub const DEFAULT_RETRY_COUNT: usize = 2;
pub const DEFAULT_THRESHOLD: usize = 1;

/// Merge, restart and retry policy of a page accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AccumulatorConfig {
    /// Prepend each new page before existing items and follow backward cursors
    #[serde(default)]
    pub reversed: bool,
    /// Reset the list to empty when a new session starts
    #[serde(default = "default_true")]
    pub clear_on_restart: bool,
    /// Suppress list emissions equal to the previous emission
    #[serde(default)]
    pub dedup_consecutive: bool,
    /// Automatic retries of a failing fetch before the page counts as failed
    #[serde(default = "default_retry_count")]
    pub retry_count: usize,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            reversed: false,
            clear_on_restart: true,
            dedup_consecutive: false,
            retry_count: DEFAULT_RETRY_COUNT,
        }
    }
}

impl AccumulatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.retry_count > MAX_RETRY_COUNT {
            bail!(
                "retry_count must be at most {MAX_RETRY_COUNT}, got {}",
                self.retry_count
            );
        }
        Ok(())
    }

    #[must_use]
    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    #[must_use]
    pub fn clear_on_restart(mut self, clear_on_restart: bool) -> Self {
        self.clear_on_restart = clear_on_restart;
        self
    }

    #[must_use]
    pub fn dedup_consecutive(mut self, dedup_consecutive: bool) -> Self {
        self.dedup_consecutive = dedup_consecutive;
        self
    }

    #[must_use]
    pub fn retry_count(mut self, retry_count: usize) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Total fetch attempts for one page
    pub fn max_attempts(&self) -> usize {
        self.retry_count + 1
    }
}

/// Gating policy of a scroll trigger monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScrollConfig {
    /// Items from the end of the list at which a load is triggered
    #[serde(default = "default_threshold")]
    pub threshold: usize,
    /// Expected page size. Lists shorter than one page are treated as the last page.
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            page_size: None,
        }
    }
}

impl ScrollConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == Some(0) {
            bail!("page_size must be greater than zero when set");
        }
        Ok(())
    }

    #[must_use]
    pub fn threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

fn default_true() -> bool {
    true
}

fn default_retry_count() -> usize {
    DEFAULT_RETRY_COUNT
}

fn default_threshold() -> usize {
    DEFAULT_THRESHOLD
}
