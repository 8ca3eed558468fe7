//! # feedpager - cursor pagination for infinite-scroll feeds
//!
//! This crate turns "load more" signals and a cursor-aware fetch function
//! into one continuously growing list, with at most one fetch in flight.
//!
//! ## Architecture Overview
//!
//! - **Domain** (`domain`): cursors, pages, scroll samples and load outcomes
//! - **State** (`core::pagination`): a pure state machine updated by messages
//! - **Command** (`core::cmd`): side effects requested by a state transition
//! - **Trigger** (`core::scroll_trigger`): gates scroll samples into page requests
//! - **Service** (`infrastructure::accumulator`): a tokio task that owns the
//!   state, runs fetches and publishes the list over watch channels
//!
//! ## Example Usage
//!
//! ```rust
//! use feedpager::{
//!     core::config::AccumulatorConfig,
//!     domain::{Cursor, Page},
//!     infrastructure::{accumulator::PageAccumulator, fetcher::fetcher_fn},
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> feedpager::Result<()> {
//! let fetcher = fetcher_fn(|query: String, cursor: Cursor| async move {
//!     let page = match cursor.as_str() {
//!         "" => Page::new(vec![format!("{query} 1"), format!("{query} 2")], "A"),
//!         _ => Page::empty(),
//!     };
//!     Ok(page)
//! });
//!
//! let feed = PageAccumulator::new(AccumulatorConfig::default(), fetcher)?.spawn();
//! feed.restart("shoes".to_string());
//! feed.until_idle().await?;
//! assert_eq!(feed.current_items().len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`domain`] - Plain data types
//! - [`core`] - Pure state machines and configuration
//! - [`infrastructure`] - Async service, fetchers, config files and CLI
//! - [`utils`] - Logging, panic handling and paths

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod utils;

// Re-exports for convenience
pub use crate::core::{
    config::{AccumulatorConfig, ScrollConfig},
    pagination::{PaginationSnapshot, PaginationState},
    scroll_trigger::{PageLoader, ScrollTriggerMonitor},
};
pub use domain::{Cursor, Page, PageLoadOutcome, ScrollSample};
pub use infrastructure::{
    accumulator::{AccumulatorHandle, PageAccumulator},
    fetcher::{fetcher_fn, PageFetcher},
};

/// Result type used throughout the library
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
