use std::sync::Arc;

use color_eyre::eyre::{eyre, Result};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        cmd::{Cmd, FetchRequest, ListChange},
        config::AccumulatorConfig,
        pagination::{Message, PaginationSnapshot, PaginationState},
        scroll_trigger::PageLoader,
    },
    domain::PageLoadOutcome,
    infrastructure::fetcher::{fetch_with_retry, PageFetcher},
};

/// Per-page item transform applied before merging
pub type PageTransform<T> = Arc<dyn Fn(Vec<T>) -> Vec<T> + Send + Sync>;

/// Requests sent from handles to the accumulator service
enum Command<P> {
    Restart(P),
    LoadNextPage,
    Reload,
    /// Acknowledged once every earlier command has been applied
    Sync(oneshot::Sender<()>),
}

/// PageAccumulator owns the pagination state of one feed
///
/// Once spawned it runs as a background task that is the sole writer of the
/// state and of the published outputs. Callers interact through an
/// [`AccumulatorHandle`]:
/// - `restart` starts a new session and fetches its first page
/// - `load_next_page` requests the following page
/// - `items`, `fetching` and `snapshots` are multi-subscriber watch channels
///
/// Fetches run on spawned tasks and report back tagged with the session
/// generation, so results of superseded sessions are dropped.
pub struct PageAccumulator<P, T> {
    config: AccumulatorConfig,
    fetcher: Arc<dyn PageFetcher<P, T>>,
    transform: Option<PageTransform<T>>,
}

impl<P, T> PageAccumulator<P, T>
where
    P: Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a new accumulator with validated configuration
    pub fn new(config: AccumulatorConfig, fetcher: impl PageFetcher<P, T>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fetcher: Arc::new(fetcher),
            transform: None,
        })
    }

    /// Transform each page's items before they are merged
    ///
    /// Termination still depends on the number of items the source returned.
    #[must_use]
    pub fn with_page_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Vec<T>) -> Vec<T> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn config(&self) -> &AccumulatorConfig {
        &self.config
    }

    /// Run the accumulator in a background task
    ///
    /// Must be called within a tokio runtime. The task stops when the
    /// handle's `shutdown` is called or every handle has been dropped.
    pub fn spawn(self) -> AccumulatorHandle<P, T> {
        let state = PaginationState::new(self.config);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        let (items_tx, items_rx) = watch::channel(Vec::new());
        let (fetching_tx, fetching_rx) = watch::channel(false);
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());
        let cancel_token = CancellationToken::new();

        let service = AccumulatorService {
            state,
            fetcher: self.fetcher,
            transform: self.transform,
            cmd_rx,
            result_tx,
            result_rx,
            cancel_token: cancel_token.clone(),
            items_tx,
            fetching_tx,
            snapshot_tx,
        };
        tokio::spawn(service.run());

        AccumulatorHandle {
            cmd_tx,
            items_rx,
            fetching_rx,
            snapshot_rx,
            cancel_token,
        }
    }
}

struct AccumulatorService<P, T> {
    state: PaginationState<P, T>,
    fetcher: Arc<dyn PageFetcher<P, T>>,
    transform: Option<PageTransform<T>>,
    // Incoming channels
    cmd_rx: mpsc::UnboundedReceiver<Command<P>>,
    result_tx: mpsc::UnboundedSender<Message<P, T>>,
    result_rx: mpsc::UnboundedReceiver<Message<P, T>>,
    cancel_token: CancellationToken,
    // Outgoing channels
    items_tx: watch::Sender<Vec<T>>,
    fetching_tx: watch::Sender<bool>,
    snapshot_tx: watch::Sender<PaginationSnapshot>,
}

impl<P, T> AccumulatorService<P, T>
where
    P: Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Main service loop
    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                _ = self.cancel_token.cancelled() => {
                    log::info!("PageAccumulator received cancellation signal");
                    break;
                }

                Some(message) = self.result_rx.recv() => {
                    self.apply(message);
                }

                command = self.cmd_rx.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        None => {
                            log::debug!("PageAccumulator: all handles dropped");
                            break;
                        }
                    }
                }
            }
        }
    }

    fn handle_command(&mut self, command: Command<P>) {
        match command {
            Command::Restart(params) => {
                log::info!(
                    "PageAccumulator: starting session {}",
                    self.state.generation() + 1
                );
                self.apply(Message::SessionRestarted { params });
            }
            Command::LoadNextPage => self.apply(Message::NextPageRequested),
            Command::Reload => self.apply(Message::ReloadRequested),
            Command::Sync(ack) => {
                let _ = ack.send(());
            }
        }
    }

    /// Feed a message through the state machine and execute the resulting commands
    fn apply(&mut self, message: Message<P, T>) {
        for cmd in self.state.update(message) {
            match cmd {
                Cmd::Fetch(request) => self.dispatch(request),
                Cmd::EmitItems(change) => self.emit_items(change),
            }
        }

        let is_fetching = self.state.is_fetching();
        self.fetching_tx.send_if_modified(|current| {
            if *current == is_fetching {
                return false;
            }
            *current = is_fetching;
            true
        });

        let snapshot = self.state.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }

    /// Apply a list change to the published list without copying it
    fn emit_items(&self, change: ListChange<T>) {
        let dedup = self.state.config().dedup_consecutive;
        self.items_tx.send_if_modified(|list| change.apply(list) || !dedup);
    }

    fn dispatch(&self, request: FetchRequest<P>) {
        log::debug!(
            "PageAccumulator: fetching page {} of session {} at cursor '{}'",
            self.state.page_count() + 1,
            request.generation,
            request.cursor
        );

        let fetcher = Arc::clone(&self.fetcher);
        let transform = self.transform.clone();
        let result_tx = self.result_tx.clone();
        let config = *self.state.config();

        tokio::spawn(async move {
            let message =
                match fetch_with_retry(fetcher.as_ref(), &request, config.max_attempts()).await {
                    Ok(page) => {
                        let fetched = page.len();
                        let continuation = page.continuation(config.reversed).clone();
                        let items = match transform {
                            Some(transform) => transform(page.items),
                            None => page.items,
                        };
                        Message::PageLoaded {
                            generation: request.generation,
                            items,
                            fetched,
                            continuation,
                        }
                    }
                    Err(attempts) => Message::PageFailed {
                        generation: request.generation,
                        attempts,
                    },
                };
            // The service may have shut down while the fetch was in flight
            let _ = result_tx.send(message);
        });
    }
}

/// Cloneable handle driving a running [`PageAccumulator`]
///
/// All trigger methods return immediately; their effect is applied by the
/// service task in the order they were sent.
pub struct AccumulatorHandle<P, T> {
    cmd_tx: mpsc::UnboundedSender<Command<P>>,
    items_rx: watch::Receiver<Vec<T>>,
    fetching_rx: watch::Receiver<bool>,
    snapshot_rx: watch::Receiver<PaginationSnapshot>,
    cancel_token: CancellationToken,
}

impl<P, T> Clone for AccumulatorHandle<P, T> {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            items_rx: self.items_rx.clone(),
            fetching_rx: self.fetching_rx.clone(),
            snapshot_rx: self.snapshot_rx.clone(),
            cancel_token: self.cancel_token.clone(),
        }
    }
}

impl<P, T: Clone> AccumulatorHandle<P, T> {
    fn send(&self, command: Command<P>) {
        if self.cmd_tx.send(command).is_err() {
            log::warn!("PageAccumulator is not running, command dropped");
        }
    }

    /// Start a new session, abandoning any outstanding fetch
    pub fn restart(&self, params: P) {
        self.send(Command::Restart(params));
    }

    /// Request the next page of the current session
    ///
    /// Ignored while a fetch is in flight or after the session ended.
    pub fn load_next_page(&self) {
        self.send(Command::LoadNextPage);
    }

    /// Request the next page, retrying it if the previous attempt failed
    pub fn reload(&self) {
        self.send(Command::Reload);
    }

    /// Subscribe to the accumulated list
    pub fn items(&self) -> watch::Receiver<Vec<T>> {
        self.items_rx.clone()
    }

    /// Subscribe to the fetching flag
    pub fn fetching(&self) -> watch::Receiver<bool> {
        self.fetching_rx.clone()
    }

    pub fn snapshots(&self) -> watch::Receiver<PaginationSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn current_items(&self) -> Vec<T> {
        self.items_rx.borrow().clone()
    }

    pub fn is_fetching(&self) -> bool {
        *self.fetching_rx.borrow()
    }

    pub fn snapshot(&self) -> PaginationSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn outcome(&self) -> Option<PageLoadOutcome> {
        self.snapshot_rx.borrow().outcome
    }

    /// Wait until every command sent so far has been applied
    pub async fn flush(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Sync(ack_tx))
            .map_err(|_| eyre!("PageAccumulator is not running"))?;
        ack_rx.await?;
        Ok(())
    }

    /// Wait until every command sent so far has been applied and no fetch is in flight
    pub async fn until_idle(&self) -> Result<PaginationSnapshot> {
        self.flush().await?;

        let mut fetching = self.fetching_rx.clone();
        fetching.wait_for(|is_fetching| !*is_fetching).await?;
        Ok(self.snapshot())
    }

    /// Stop the service task
    ///
    /// Fetches still in flight run to completion but their results are dropped.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancel_token.is_cancelled() && !self.cmd_tx.is_closed()
    }
}

impl<P, T: Clone> PageLoader for AccumulatorHandle<P, T> {
    fn load_next_page(&self) {
        AccumulatorHandle::load_next_page(self);
    }

    fn reload(&self) {
        AccumulatorHandle::reload(self);
    }

    fn is_loading(&self) -> bool {
        self.is_fetching()
    }

    fn is_exhausted(&self) -> bool {
        self.outcome().is_some_and(|outcome| outcome.is_terminal())
    }
}
