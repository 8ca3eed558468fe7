use std::cell::Cell;

use color_eyre::eyre::Result;
use feedpager::{
    infrastructure::{
        config::DemoConfig,
        demo_source::{CatalogQuery, DemoCatalog},
    },
    AccumulatorConfig, PageAccumulator, PageLoadOutcome, PageLoader, ScrollConfig, ScrollSample,
    ScrollTriggerMonitor,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[derive(Default)]
struct CountingLoader {
    loads: Cell<usize>,
    loading: Cell<bool>,
}

impl PageLoader for CountingLoader {
    fn load_next_page(&self) {
        self.loads.set(self.loads.get() + 1);
    }

    fn is_loading(&self) -> bool {
        self.loading.get()
    }
}

fn monitor(threshold: usize) -> Result<ScrollTriggerMonitor<CountingLoader>> {
    ScrollTriggerMonitor::new(
        ScrollConfig::default().threshold(threshold),
        CountingLoader::default(),
    )
}

#[test]
fn test_identical_sample_does_not_trigger_twice() -> Result<()> {
    let mut monitor = monitor(2)?;
    let sample = ScrollSample::forward(97, 100);

    assert!(!monitor.is_last_page(&sample));
    assert!(monitor.on_scroll(sample));
    assert!(!monitor.on_scroll(sample));
    assert_eq!(monitor.loader().loads.get(), 1);
    Ok(())
}

#[rstest]
#[case::single_sample(vec![(99, false)], 1)]
#[case::run_inside_zone(vec![(96, false), (97, false), (98, false), (99, false)], 1)]
#[case::run_with_jitter(vec![(97, false), (99, false), (98, false), (99, false)], 1)]
#[case::sample_during_load(vec![(97, false), (98, true), (99, false)], 1)]
#[case::outside_zone(vec![(10, false), (50, false), (80, false)], 0)]
#[case::two_runs(vec![(97, false), (99, false), (40, false), (98, false)], 2)]
#[case::leave_zone_during_load(vec![(97, false), (40, true), (98, false)], 2)]
fn test_one_load_per_run_near_end(
    #[case] samples: Vec<(usize, bool)>,
    #[case] expected: usize,
) -> Result<()> {
    let mut monitor = monitor(3)?;
    let mut previous: Option<usize> = None;
    for (index, loading) in samples {
        let forward = previous.map_or(true, |previous| index >= previous);
        let sample = if forward {
            ScrollSample::forward(index, 100)
        } else {
            ScrollSample::backward(index, 100)
        };
        monitor.loader().loading.set(loading);
        monitor.on_scroll(sample);
        previous = Some(index);
    }
    assert_eq!(monitor.loader().loads.get(), expected);
    Ok(())
}

#[test]
fn test_samples_while_loading_are_ignored() -> Result<()> {
    let mut monitor = monitor(2)?;
    monitor.loader().loading.set(true);
    for index in 97..100 {
        assert!(!monitor.on_scroll(ScrollSample::forward(index, 100)));
    }
    assert_eq!(monitor.loader().loads.get(), 0);
    Ok(())
}

#[tokio::test]
async fn test_scrolls_through_demo_catalog() -> Result<()> {
    let catalog = DemoCatalog::new(DemoConfig {
        catalog_size: 60,
        page_size: 20,
        latency_ms: 0,
        fail_every: 0,
    });
    let feed = PageAccumulator::new(AccumulatorConfig::default(), catalog.clone())?.spawn();
    let mut monitor = ScrollTriggerMonitor::new(
        ScrollConfig::default().threshold(2).page_size(20),
        feed.clone(),
    )?;

    feed.restart(CatalogQuery::new("books"));
    let mut snapshot = feed.until_idle().await?;
    assert_eq!(snapshot.item_count, 20);

    // Walk to the end of the list, five items per sample
    let mut index = 0;
    let mut triggers = 0;
    while index + 1 < snapshot.item_count {
        index = (index + 5).min(snapshot.item_count - 1);
        if monitor.on_scroll(ScrollSample::forward(index, snapshot.item_count)) {
            triggers += 1;
            snapshot = feed.until_idle().await?;
        }
    }

    let ids = feed.current_items().iter().map(|p| p.id).collect::<Vec<_>>();
    assert_eq!(ids, (0..60).collect::<Vec<_>>());
    assert_eq!(snapshot.outcome, Some(PageLoadOutcome::End));
    assert_eq!(catalog.calls(), 3);
    // Reaching the end of the finished list requests nothing
    assert_eq!(triggers, 2);
    assert!(monitor.is_last_page(&ScrollSample::forward(59, 60)));

    assert!(!monitor.on_scroll(ScrollSample::forward(59, 60)));
    assert_eq!(catalog.calls(), 3);
    Ok(())
}

#[tokio::test]
async fn test_manual_reload_after_failure() -> Result<()> {
    // Every second call fails, so the retry of a failed call succeeds
    let catalog = DemoCatalog::new(DemoConfig {
        catalog_size: 30,
        page_size: 10,
        latency_ms: 0,
        fail_every: 2,
    });
    let config = AccumulatorConfig::default().retry_count(0);
    let feed = PageAccumulator::new(config, catalog.clone())?.spawn();
    let mut monitor = ScrollTriggerMonitor::new(ScrollConfig::default(), feed.clone())?;

    feed.restart(CatalogQuery::new("toys"));
    feed.until_idle().await?;

    assert!(monitor.on_scroll(ScrollSample::forward(9, 10)));
    let snapshot = feed.until_idle().await?;
    assert_eq!(snapshot.outcome, Some(PageLoadOutcome::Failed));
    assert_eq!(snapshot.item_count, 10);

    // The failed page is not retried by scrolling
    monitor.on_scroll(ScrollSample::backward(5, 10));
    assert!(!monitor.on_scroll(ScrollSample::forward(9, 10)));
    feed.until_idle().await?;
    assert_eq!(catalog.calls(), 2);

    monitor.reload();
    let snapshot = feed.until_idle().await?;
    assert_eq!(snapshot.item_count, 20);
    assert_eq!(snapshot.outcome, Some(PageLoadOutcome::More));
    assert_eq!(catalog.calls(), 3);
    Ok(())
}
