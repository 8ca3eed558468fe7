//! Scroll-driven "load more" triggering
//!
//! The monitor turns viewport samples from a virtualized list into calls to
//! [`PageLoader::load_next_page`]. It runs synchronously on whatever thread
//! delivers the samples and never blocks.
//!
//! A trigger fires at most once per contiguous run of samples near the end
//! of the list. The trigger is re-armed only when a sample leaves the
//! trigger zone or reports a different list size, never by timing, so a
//! sample that happens to arrive during a load does not open a second
//! trigger in the same run. Nothing is replayed when loading finishes; the
//! next scroll delta is evaluated fresh.

use color_eyre::eyre::Result;

use crate::{core::config::ScrollConfig, domain::ScrollSample};

/// The accumulator side of the scroll trigger
pub trait PageLoader {
    /// Request the next page. Must return immediately.
    fn load_next_page(&self);

    /// Manual request that may also retry a failed page
    fn reload(&self) {
        self.load_next_page();
    }

    /// Whether a fetch is currently in flight
    fn is_loading(&self) -> bool;

    /// Whether the current session will not load further pages on its own
    fn is_exhausted(&self) -> bool {
        false
    }
}

impl<L: PageLoader + ?Sized> PageLoader for &L {
    fn load_next_page(&self) {
        (**self).load_next_page();
    }

    fn reload(&self) {
        (**self).reload();
    }

    fn is_loading(&self) -> bool {
        (**self).is_loading()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}

/// Caller-supplied "this is the last page" predicate
pub type LastPagePredicate = Box<dyn Fn(&ScrollSample) -> bool + Send + Sync>;

/// Notified with the last visible index of every sample
pub type VisibleItemCallback = Box<dyn FnMut(usize) + Send>;

pub struct ScrollTriggerMonitor<L> {
    config: ScrollConfig,
    loader: L,
    enabled: bool,
    armed: bool,
    last_sample: Option<ScrollSample>,
    last_page: Option<LastPagePredicate>,
    on_visible_item: Option<VisibleItemCallback>,
}

impl<L: PageLoader> ScrollTriggerMonitor<L> {
    pub fn new(config: ScrollConfig, loader: L) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            loader,
            enabled: true,
            armed: true,
            last_sample: None,
            last_page: None,
            on_visible_item: None,
        })
    }

    /// Add a predicate that suppresses triggering when it returns true
    #[must_use]
    pub fn with_last_page_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ScrollSample) -> bool + Send + Sync + 'static,
    {
        self.last_page = Some(Box::new(predicate));
        self
    }

    #[must_use]
    pub fn with_visible_item_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize) + Send + 'static,
    {
        self.on_visible_item = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last visible index of the most recent sample
    pub fn last_visible_index(&self) -> Option<usize> {
        self.last_sample.map(|sample| sample.last_visible_index)
    }

    pub fn enable(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.armed = true;
        }
        self.enabled = enabled;
    }

    pub fn disable(&mut self) {
        self.enable(false);
    }

    /// Request the next page regardless of scroll position
    ///
    /// The accumulator still ignores the request while a fetch is in flight.
    pub fn reload(&self) {
        self.loader.reload();
    }

    /// Whether triggering is suppressed for this sample
    ///
    /// True for an empty list, a list shorter than one page, disabled
    /// pagination, an exhausted loader, or when the caller's predicate says so.
    pub fn is_last_page(&self, sample: &ScrollSample) -> bool {
        sample.total_item_count == 0
            || self
                .config
                .page_size
                .is_some_and(|page_size| sample.total_item_count < page_size)
            || !self.enabled
            || self.loader.is_exhausted()
            || self.last_page.as_ref().is_some_and(|predicate| predicate(sample))
    }

    /// Evaluate a scroll sample, returning whether a page load was requested
    pub fn on_scroll(&mut self, sample: ScrollSample) -> bool {
        let previous = self.last_sample.replace(sample);
        if let Some(callback) = self.on_visible_item.as_mut() {
            callback(sample.last_visible_index);
        }

        let moved = previous.map_or(true, |previous| !previous.is_same_position(&sample));
        let resized =
            previous.is_some_and(|previous| previous.total_item_count != sample.total_item_count);
        let near_end = sample.is_near_end(self.config.threshold);
        if resized || !near_end {
            self.armed = true;
        }

        if self.loader.is_loading() || !near_end {
            return false;
        }
        if self.is_last_page(&sample) || !sample.is_forward_scroll || !moved || !self.armed {
            return false;
        }

        self.armed = false;
        log::debug!(
            "Scroll reached item {} of {}, loading next page",
            sample.last_visible_index,
            sample.total_item_count
        );
        self.loader.load_next_page();
        true
    }
}
