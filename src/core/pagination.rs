//! Pagination state for one accumulator
//!
//! This module follows the Elm Architecture pattern:
//! - State changes only through the `update` function
//! - All state transitions are explicitly defined as `Message` variants
//! - Side effects are returned as `Cmd` values and executed by the caller
//!
//! Sessions are identified by a generation counter that is bumped on every
//! restart. Page results carry the generation of the request that produced
//! them, and results from an older generation are dropped without touching
//! the state.

use serde::Serialize;

use crate::{
    core::{
        cmd::{Cmd, FetchRequest, ListChange},
        config::AccumulatorConfig,
    },
    domain::{Cursor, PageLoadOutcome},
};

/// Messages that can be sent to update the pagination state
///
/// Following Elm conventions, messages are named in past tense
/// to indicate "what happened" rather than "what to do"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<P, T> {
    /// A new session was started with the given parameters
    SessionRestarted { params: P },
    /// The next page was requested by a scroll trigger
    NextPageRequested,
    /// The next page was requested manually (e.g. "tap to retry")
    ReloadRequested,
    /// A fetch resolved with a page
    PageLoaded {
        generation: u64,
        /// Items to merge, after any page transform
        items: Vec<T>,
        /// Number of items the source returned before transforming
        fetched: usize,
        /// Cursor for the following request, already selected for the merge direction
        continuation: Cursor,
    },
    /// A fetch failed after exhausting its retries
    PageFailed { generation: u64, attempts: usize },
}

/// Diagnostic view of the pagination state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationSnapshot {
    pub generation: u64,
    pub page_count: usize,
    pub item_count: usize,
    pub cursor: Cursor,
    pub is_fetching: bool,
    pub outcome: Option<PageLoadOutcome>,
}

/// Accumulated items and cursor of the current pagination session
#[derive(Debug, Clone)]
pub struct PaginationState<P, T> {
    config: AccumulatorConfig,
    items: Vec<T>,
    cursor: Cursor,
    page_count: usize,
    is_fetching: bool,
    params: Option<P>,
    generation: u64,
    outcome: Option<PageLoadOutcome>,
}

impl<P: Clone, T: Clone> PaginationState<P, T> {
    /// Create an idle state with no session
    pub fn new(config: AccumulatorConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            cursor: Cursor::start(),
            page_count: 0,
            is_fetching: false,
            params: None,
            generation: 0,
            outcome: None,
        }
    }

    pub fn config(&self) -> &AccumulatorConfig {
        &self.config
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    pub fn params(&self) -> Option<&P> {
        self.params.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Outcome of the last resolved page, `None` until the first page of a session resolves
    pub fn outcome(&self) -> Option<PageLoadOutcome> {
        self.outcome
    }

    /// Whether automatic pagination has stopped for the current session
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some_and(|outcome| outcome.is_terminal())
    }

    pub fn snapshot(&self) -> PaginationSnapshot {
        PaginationSnapshot {
            generation: self.generation,
            page_count: self.page_count,
            item_count: self.items.len(),
            cursor: self.cursor.clone(),
            is_fetching: self.is_fetching,
            outcome: self.outcome,
        }
    }

    /// Update the pagination state based on a message
    ///
    /// This is the only way to modify the pagination state. The returned
    /// commands contain at most one `Cmd::Fetch`, and never one while a
    /// fetch of the current session is outstanding.
    pub fn update(&mut self, message: Message<P, T>) -> Vec<Cmd<P, T>> {
        match message {
            Message::SessionRestarted { params } => {
                self.generation += 1;
                self.params = Some(params);
                self.cursor = Cursor::start();
                self.page_count = 0;
                self.outcome = None;

                let mut cmds = Vec::with_capacity(2);
                if self.config.clear_on_restart {
                    self.items.clear();
                    cmds.push(Cmd::EmitItems(ListChange::Cleared));
                }
                // Any fetch still outstanding belongs to the previous generation
                // and will be ignored when it resolves.
                cmds.extend(self.dispatch());
                cmds
            }
            Message::NextPageRequested => {
                if self.is_fetching || self.is_terminal() {
                    return vec![];
                }
                self.dispatch().into_iter().collect()
            }
            Message::ReloadRequested => {
                if self.is_fetching || self.outcome == Some(PageLoadOutcome::End) {
                    return vec![];
                }
                self.dispatch().into_iter().collect()
            }
            Message::PageLoaded {
                generation,
                items,
                fetched,
                continuation,
            } => {
                if !self.accepts(generation) {
                    log::debug!(
                        "Discarding page of superseded session {generation} (current {})",
                        self.generation
                    );
                    return vec![];
                }
                self.is_fetching = false;
                self.page_count += 1;

                if fetched == 0 {
                    self.outcome = Some(PageLoadOutcome::End);
                } else {
                    self.outcome = Some(if continuation.is_empty() {
                        PageLoadOutcome::End
                    } else {
                        PageLoadOutcome::More
                    });
                    self.cursor = continuation;
                }

                if self.config.reversed {
                    let mut merged = items.clone();
                    merged.append(&mut self.items);
                    self.items = merged;
                    vec![Cmd::EmitItems(ListChange::Prepended(items))]
                } else {
                    self.items.extend_from_slice(&items);
                    vec![Cmd::EmitItems(ListChange::Appended(items))]
                }
            }
            Message::PageFailed {
                generation,
                attempts,
            } => {
                if !self.accepts(generation) {
                    log::debug!("Discarding failure of superseded session {generation}");
                    return vec![];
                }
                log::warn!(
                    "Page {} failed after {attempts} attempts, pagination stopped",
                    self.page_count + 1
                );
                self.is_fetching = false;
                self.outcome = Some(PageLoadOutcome::Failed);
                vec![]
            }
        }
    }

    fn accepts(&self, generation: u64) -> bool {
        generation == self.generation && self.is_fetching
    }

    fn dispatch(&mut self) -> Option<Cmd<P, T>> {
        let params = self.params.clone()?;
        self.is_fetching = true;
        Some(Cmd::Fetch(FetchRequest {
            generation: self.generation,
            params,
            cursor: self.cursor.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    type State = PaginationState<&'static str, u32>;

    fn loaded(generation: u64, items: Vec<u32>, continuation: &str) -> Message<&'static str, u32> {
        Message::PageLoaded {
            generation,
            fetched: items.len(),
            items,
            continuation: Cursor::from(continuation),
        }
    }

    fn fetch_of(cmds: &[Cmd<&'static str, u32>]) -> Option<FetchRequest<&'static str>> {
        cmds.iter().find_map(Cmd::as_fetch).cloned()
    }

    #[test]
    fn test_state_default() {
        let state = State::new(AccumulatorConfig::default());
        assert!(state.items().is_empty());
        assert!(!state.is_fetching());
        assert_eq!(state.generation(), 0);
        assert_eq!(state.outcome(), None);
        assert_eq!(state.params(), None);
    }

    #[test]
    fn test_next_page_without_session_is_noop() {
        let mut state = State::new(AccumulatorConfig::default());
        assert!(state.update(Message::NextPageRequested).is_empty());
        assert!(state.update(Message::ReloadRequested).is_empty());
        assert!(!state.is_fetching());
    }

    #[test]
    fn test_restart_clears_and_dispatches_first_page() {
        let mut state = State::new(AccumulatorConfig::default());
        let cmds = state.update(Message::SessionRestarted { params: "shoes" });

        assert_eq!(cmds[0], Cmd::EmitItems(ListChange::Cleared));
        let request = fetch_of(&cmds).expect("first page dispatched");
        assert_eq!(request.generation, 1);
        assert_eq!(request.params, "shoes");
        assert!(request.cursor.is_empty());
        assert!(state.is_fetching());
    }

    #[test]
    fn test_restart_without_clear_keeps_items() {
        let config = AccumulatorConfig::default().clear_on_restart(false);
        let mut state = State::new(config);
        state.update(Message::SessionRestarted { params: "a" });
        state.update(loaded(1, vec![1, 2], "A"));

        let cmds = state.update(Message::SessionRestarted { params: "b" });
        assert!(!cmds.contains(&Cmd::EmitItems(ListChange::Cleared)));
        assert_eq!(state.items(), &[1, 2]);

        state.update(loaded(2, vec![3], "B"));
        assert_eq!(state.items(), &[1, 2, 3]);
    }

    #[test]
    fn test_next_page_while_fetching_is_noop() {
        let mut state = State::new(AccumulatorConfig::default());
        state.update(Message::SessionRestarted { params: "a" });

        assert!(state.update(Message::NextPageRequested).is_empty());
        assert!(state.update(Message::ReloadRequested).is_empty());
    }

    #[test]
    fn test_pages_append_and_advance_cursor() {
        let mut state = State::new(AccumulatorConfig::default());
        state.update(Message::SessionRestarted { params: "a" });
        assert_eq!(
            state.update(loaded(1, vec![1, 2], "A")),
            vec![Cmd::EmitItems(ListChange::Appended(vec![1, 2]))]
        );
        assert_eq!(state.cursor(), &Cursor::from("A"));
        assert_eq!(state.outcome(), Some(PageLoadOutcome::More));

        let cmds = state.update(Message::NextPageRequested);
        let request = fetch_of(&cmds).expect("second page dispatched");
        assert_eq!(request.cursor, Cursor::from("A"));

        state.update(loaded(1, vec![3, 4], "B"));
        assert_eq!(state.items(), &[1, 2, 3, 4]);
        assert_eq!(state.page_count(), 2);
    }

    #[test]
    fn test_reversed_prepends_pages() {
        let mut state = State::new(AccumulatorConfig::default().reversed(true));
        state.update(Message::SessionRestarted { params: "chat" });
        state.update(loaded(1, vec![5, 6], "older"));
        state.update(Message::NextPageRequested);
        let cmds = state.update(loaded(1, vec![3, 4], "oldest"));
        assert_eq!(cmds, vec![Cmd::EmitItems(ListChange::Prepended(vec![3, 4]))]);
        assert_eq!(state.items(), &[3, 4, 5, 6]);
    }

    #[test]
    fn test_empty_page_is_terminal() {
        let mut state = State::new(AccumulatorConfig::default());
        state.update(Message::SessionRestarted { params: "a" });
        state.update(loaded(1, vec![1], "A"));
        state.update(Message::NextPageRequested);
        state.update(loaded(1, vec![], ""));

        assert_eq!(state.outcome(), Some(PageLoadOutcome::End));
        assert_eq!(state.cursor(), &Cursor::from("A"));
        assert!(state.update(Message::NextPageRequested).is_empty());
        assert!(state.update(Message::ReloadRequested).is_empty());
    }

    #[test]
    fn test_missing_continuation_ends_session_after_merge() {
        let mut state = State::new(AccumulatorConfig::default());
        state.update(Message::SessionRestarted { params: "a" });
        state.update(loaded(1, vec![1, 2, 3], ""));

        assert_eq!(state.items(), &[1, 2, 3]);
        assert_eq!(state.outcome(), Some(PageLoadOutcome::End));
        assert!(state.update(Message::NextPageRequested).is_empty());
    }

    #[test]
    fn test_stale_page_is_discarded() {
        let mut state = State::new(AccumulatorConfig::default());
        state.update(Message::SessionRestarted { params: "x" });
        state.update(Message::SessionRestarted { params: "y" });

        assert!(state.update(loaded(1, vec![10, 11], "X")).is_empty());
        assert!(state.items().is_empty());
        assert!(state.is_fetching());

        state.update(loaded(2, vec![20], "Y"));
        assert_eq!(state.items(), &[20]);
        assert_eq!(state.params(), Some(&"y"));
    }

    #[test]
    fn test_failure_stops_pagination_but_allows_reload() {
        let mut state = State::new(AccumulatorConfig::default());
        state.update(Message::SessionRestarted { params: "a" });
        state.update(loaded(1, vec![1, 2], "A"));
        state.update(Message::NextPageRequested);

        let cmds = state.update(Message::PageFailed {
            generation: 1,
            attempts: 3,
        });
        assert!(cmds.is_empty());
        assert!(!state.is_fetching());
        assert_eq!(state.outcome(), Some(PageLoadOutcome::Failed));
        assert_eq!(state.items(), &[1, 2]);

        assert!(state.update(Message::NextPageRequested).is_empty());

        let cmds = state.update(Message::ReloadRequested);
        let request = fetch_of(&cmds).expect("reload re-dispatches the failed page");
        assert_eq!(request.cursor, Cursor::from("A"));
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut state = State::new(AccumulatorConfig::default());
        state.update(Message::SessionRestarted { params: "a" });
        state.update(Message::SessionRestarted { params: "b" });
        state.update(Message::PageFailed {
            generation: 1,
            attempts: 3,
        });
        assert!(state.is_fetching());
        assert_eq!(state.outcome(), None);
    }

    #[test]
    fn test_transformed_page_uses_raw_size_for_termination() {
        let mut state = State::new(AccumulatorConfig::default());
        state.update(Message::SessionRestarted { params: "a" });
        // Every item was filtered out, but the source still had data
        state.update(Message::PageLoaded {
            generation: 1,
            items: vec![],
            fetched: 25,
            continuation: Cursor::from("A"),
        });
        assert_eq!(state.outcome(), Some(PageLoadOutcome::More));
        assert!(!state.update(Message::NextPageRequested).is_empty());
    }

    #[test]
    fn test_snapshot() {
        let mut state = State::new(AccumulatorConfig::default());
        state.update(Message::SessionRestarted { params: "a" });
        state.update(loaded(1, vec![1, 2], "A"));

        assert_eq!(
            state.snapshot(),
            PaginationSnapshot {
                generation: 1,
                page_count: 1,
                item_count: 2,
                cursor: Cursor::from("A"),
                is_fetching: false,
                outcome: Some(PageLoadOutcome::More),
            }
        );
    }
}
