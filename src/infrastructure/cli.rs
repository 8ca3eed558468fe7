use clap::{builder::RangedU64ValueParser, Parser};

use crate::utils::version;

/// Scroll through a simulated storefront catalog, loading pages on demand
#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Category to browse
    #[arg(default_value = "all")]
    pub category: String,

    /// Number of items in the simulated catalog
    #[arg(long, value_name = "COUNT")]
    pub catalog_size: Option<usize>,

    /// Items returned per page
    #[arg(long, value_name = "COUNT")]
    pub page_size: Option<usize>,

    /// Fail every n-th fetch call (0 disables failures)
    #[arg(long, value_name = "N")]
    pub fail_every: Option<usize>,

    /// Items from the end of the list at which the next page loads
    #[arg(short, long, value_name = "COUNT")]
    pub threshold: Option<usize>,

    /// Items scrolled per simulated scroll event
    #[arg(
        short,
        long,
        value_name = "COUNT",
        default_value_t = 10,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub scroll_step: usize,

    /// Prepend pages instead of appending them (chat-style feed)
    #[arg(long)]
    pub reversed: bool,

    /// Manual retries ("tap to retry") allowed after a failed page
    #[arg(long, value_name = "COUNT", default_value_t = 1)]
    pub reloads: usize,

    /// Print the final list as JSON
    #[arg(long)]
    pub json: bool,
}
