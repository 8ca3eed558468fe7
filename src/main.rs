use clap::Parser;
use color_eyre::eyre::Result;

use feedpager::{
    infrastructure::{
        accumulator::PageAccumulator,
        cli::Cli,
        config::Config,
        demo_source::{CatalogQuery, DemoCatalog},
    },
    utils::{initialize_logging, initialize_panic_handler},
    PageLoadOutcome, ScrollSample, ScrollTriggerMonitor,
};

async fn tokio_main() -> Result<()> {
    initialize_logging()?;

    initialize_panic_handler()?;

    let args = <Cli as Parser>::parse();

    // Load configuration (file-based), then apply CLI overrides
    let mut config = Config::new()?;
    if let Some(catalog_size) = args.catalog_size {
        config.demo.catalog_size = catalog_size;
    }
    if let Some(page_size) = args.page_size {
        config.demo.page_size = page_size;
        config.scroll.page_size = Some(page_size);
    }
    if let Some(fail_every) = args.fail_every {
        config.demo.fail_every = fail_every;
    }
    if let Some(threshold) = args.threshold {
        config.scroll.threshold = threshold;
    }
    config.pagination.reversed |= args.reversed;
    config.validate()?;

    let catalog = DemoCatalog::new(config.demo.clone());
    let feed = PageAccumulator::new(config.pagination, catalog.clone())?.spawn();
    let mut monitor = ScrollTriggerMonitor::new(config.scroll, feed.clone())?;

    let mut query = CatalogQuery::new(args.category.clone());
    if config.pagination.reversed {
        query = query.from_end();
    }
    feed.restart(query);
    let mut snapshot = feed.until_idle().await?;
    println!(
        "page {}: {} items ({})",
        snapshot.page_count,
        snapshot.item_count,
        describe(snapshot.outcome)
    );

    // Scroll forward through the list the way a user would
    let mut position = 0;
    let mut reloads_left = args.reloads;
    loop {
        let total = snapshot.item_count;
        if total == 0 {
            break;
        }
        position = (position + args.scroll_step).min(total - 1);

        if monitor.on_scroll(ScrollSample::forward(position, total)) {
            snapshot = feed.until_idle().await?;
            println!(
                "page {}: {} items ({})",
                snapshot.page_count,
                snapshot.item_count,
                describe(snapshot.outcome)
            );
            continue;
        }

        if position + 1 < total {
            continue;
        }
        match snapshot.outcome {
            Some(PageLoadOutcome::Failed) if reloads_left > 0 => {
                reloads_left -= 1;
                println!("retrying failed page");
                monitor.reload();
                snapshot = feed.until_idle().await?;
            }
            // Resting at the end of a list that will not grow any further
            _ => break,
        }
    }

    feed.shutdown();
    println!(
        "done: {} items in {} pages, {} fetch calls",
        snapshot.item_count,
        snapshot.page_count,
        catalog.calls()
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(&feed.current_items())?);
    }

    Ok(())
}

fn describe(outcome: Option<PageLoadOutcome>) -> String {
    outcome.map_or_else(|| "pending".to_string(), |outcome| outcome.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = tokio_main().await {
        eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
        Err(e)
    } else {
        Ok(())
    }
}
