use serde::{Deserialize, Serialize};
use strum::Display;

/// How the most recent page load of a session resolved
///
/// `End` and `Failed` both stop automatic pagination. They are kept apart so
/// the UI can offer "tap to retry" only when the feed stopped because of an
/// error rather than because the source ran out of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PageLoadOutcome {
    /// The page was merged and the source has more pages
    More,
    /// The source returned an empty page or no continuation cursor
    End,
    /// The fetch kept failing after every retry
    Failed,
}

impl PageLoadOutcome {
    /// Whether automatic pagination stops after this outcome
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PageLoadOutcome::More)
    }
}
