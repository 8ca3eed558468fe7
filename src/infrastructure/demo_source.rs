//! Simulated paged catalog
//!
//! Stands in for the storefront's network client in the demo binary and in
//! tests. Forward cursors are the offset of the next page's first item,
//! backward cursors are `-` followed by the offset the previous page ends at.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use color_eyre::eyre::{bail, eyre, Result};
use serde::Serialize;

use crate::{
    domain::{Cursor, Page},
    infrastructure::{
        config::DemoConfig,
        fetcher::{FetchFuture, PageFetcher},
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: usize,
    pub name: String,
    pub category: String,
}

/// Catalog query parameters, the session key of the demo feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub category: String,
    /// Start at the newest items and page backwards
    pub from_end: bool,
}

impl CatalogQuery {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            from_end: false,
        }
    }

    #[must_use]
    pub fn from_end(mut self) -> Self {
        self.from_end = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct DemoCatalog {
    config: DemoConfig,
    calls: Arc<AtomicUsize>,
}

impl DemoCatalog {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            config,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of fetch calls made so far, including failed ones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn page(config: &DemoConfig, query: &CatalogQuery, cursor: &Cursor) -> Result<Page<Product>> {
        let size = config.catalog_size;
        let parse = |value: &str| {
            value
                .parse::<usize>()
                .map_err(|e| eyre!("invalid cursor '{cursor}': {e}"))
        };
        let (start, end) = match cursor.as_str() {
            "" if query.from_end => (size.saturating_sub(config.page_size), size),
            "" => (0, config.page_size.min(size)),
            value => match value.strip_prefix('-') {
                Some(before) => {
                    let end = parse(before)?.min(size);
                    (end.saturating_sub(config.page_size), end)
                }
                None => {
                    let start = parse(value)?.min(size);
                    (start, (start + config.page_size).min(size))
                }
            },
        };

        let items = (start..end)
            .map(|id| Product {
                id,
                name: format!("{} #{id}", query.category),
                category: query.category.clone(),
            })
            .collect::<Vec<_>>();

        let next_cursor = if end < size {
            Cursor::from(end.to_string())
        } else {
            Cursor::start()
        };
        let previous_cursor = if start > 0 {
            Cursor::from(format!("-{start}"))
        } else {
            Cursor::start()
        };
        Ok(Page::new(items, next_cursor).with_previous_cursor(previous_cursor))
    }
}

impl PageFetcher<CatalogQuery, Product> for DemoCatalog {
    fn fetch(&self, params: CatalogQuery, cursor: Cursor) -> FetchFuture<Product> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let config = self.config.clone();
        Box::pin(async move {
            if config.latency_ms > 0 {
                tokio::time::sleep(Duration::from_millis(config.latency_ms)).await;
            }
            if config.fail_every > 0 && call % config.fail_every == 0 {
                bail!("simulated network failure on call {call}");
            }
            Self::page(&config, &params, &cursor)
        })
    }
}
