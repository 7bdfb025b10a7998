use std::fmt;
use std::pin::pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use reelshelf_contracts::LocalPageStore;
use reelshelf_model::{PagerState, PagingWindowConfig};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::merge::{MapFn, MergeSupervisor, StatePublisher};
use super::scroll::{ScrollAction, ScrollThresholds};
use super::window::LocalPagingWindow;
use crate::error::{PagingError, Result};

/// Drives a [`LocalPagingWindow`] from scroll positions and republishes the
/// resident pages as one mapped list.
///
/// Lifecycle: [`Self::initialize`] once, observe through [`Self::subscribe`],
/// and [`Self::invalidate`] (or drop) to stop every background task. An
/// invalidated controller cannot be initialized again.
///
/// Two tasks run after initialization. The scroll task is the single writer
/// of the window; it loads pages strictly in the order scroll decisions are
/// made. The merge task reads the resident feeds and is replaced, never
/// stacked, every time the window moves.
pub struct WindowedPagerController<T, R, S> {
    config: PagingWindowConfig,
    thresholds: ScrollThresholds,
    window: Option<LocalPagingWindow<T, S>>,
    map: MapFn<T, R>,
    publisher: Arc<StatePublisher<R>>,
    state: watch::Receiver<PagerState<R>>,
    resident: Arc<watch::Sender<Vec<u32>>>,
    cancel: CancellationToken,
    scroll_task: Option<JoinHandle<()>>,
}

impl<T, R, S> fmt::Debug for WindowedPagerController<T, R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowedPagerController")
            .field("config", &self.config)
            .field("thresholds", &self.thresholds)
            .field("awaiting_initialize", &self.window.is_some())
            .field("resident", &*self.resident.borrow())
            .field(
                "scroll_task_running",
                &self.scroll_task.as_ref().is_some_and(|task| !task.is_finished()),
            )
            .field("invalidated", &self.cancel.is_cancelled())
            .finish()
    }
}

impl<T, R, S> WindowedPagerController<T, R, S>
where
    T: Clone + Send + Sync + 'static,
    R: Send + Sync + 'static,
    S: LocalPageStore<T> + 'static,
{
    pub fn new<F>(config: PagingWindowConfig, store: Arc<S>, map: F) -> Self
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        let (publisher, state) = StatePublisher::new();
        let (resident, _) = watch::channel(Vec::new());

        Self {
            config,
            thresholds: ScrollThresholds::from_config(&config),
            window: Some(LocalPagingWindow::new(config, store)),
            map: Arc::new(map),
            publisher: Arc::new(publisher),
            state,
            resident: Arc::new(resident),
            cancel: CancellationToken::new(),
            scroll_task: None,
        }
    }

    pub fn thresholds(&self) -> ScrollThresholds {
        self.thresholds
    }

    /// Load the first `max_pages` pages, publish the merged list, then start
    /// following `scroll_positions` (first visible item index).
    pub async fn initialize<P>(&mut self, scroll_positions: P) -> Result<()>
    where
        P: Stream<Item = usize> + Send + 'static,
    {
        if self.cancel.is_cancelled() {
            return Err(PagingError::Invalidated);
        }
        let mut window =
            self.window.take().ok_or(PagingError::AlreadyInitialized)?;

        for _ in 0..self.config.max_pages() {
            match window.append_next().await {
                Ok(change) if change.is_changed() => {}
                Ok(_) => break,
                Err(err) => {
                    error!(error = %err, "initial window load failed");
                    self.publisher.fail(err.to_string());
                    return Err(err.into());
                }
            }
        }

        let resident = window.resident_pages();
        info!(?resident, "local window initialized");
        self.resident.send_replace(resident);

        let mut merges = MergeSupervisor::new(
            self.cancel.child_token(),
            Arc::clone(&self.publisher),
            Arc::clone(&self.map),
        );
        merges.restart(window.feeds());

        let driver = ScrollDriver {
            window,
            merges,
            thresholds: self.thresholds,
            resident: Arc::clone(&self.resident),
            cancel: self.cancel.clone(),
        };
        self.scroll_task = Some(tokio::spawn(driver.run(scroll_positions)));
        Ok(())
    }

    /// Current materialized state.
    pub fn state(&self) -> PagerState<R> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PagerState<R>> {
        self.publisher.subscribe()
    }

    /// Resident page numbers as of the last window change.
    pub fn resident_pages(&self) -> Vec<u32> {
        self.resident.borrow().clone()
    }

    pub fn subscribe_window(&self) -> watch::Receiver<Vec<u32>> {
        self.resident.subscribe()
    }

    pub fn is_invalidated(&self) -> bool {
        self.publisher.is_closed()
    }

    /// Wait until the scroll source is exhausted. Merged state keeps
    /// following store changes afterwards.
    pub async fn scroll_finished(&mut self) {
        if let Some(task) = self.scroll_task.take() {
            match task.await {
                Ok(()) => {}
                Err(err) if err.is_cancelled() => {}
                Err(err) => warn!(error = %err, "scroll task failed"),
            }
        }
    }

    /// Cancel scroll observation and the merge pipeline. No state is
    /// published after this returns.
    pub fn invalidate(&mut self) {
        self.cancel.cancel();
        self.publisher.close();
        if let Some(task) = self.scroll_task.take() {
            task.abort();
        }
        self.window = None;
        info!("windowed pager invalidated");
    }
}

impl<T, R, S> Drop for WindowedPagerController<T, R, S> {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.publisher.close();
        if let Some(task) = self.scroll_task.take() {
            task.abort();
        }
    }
}

/// State owned by the scroll task; nothing else touches the window.
struct ScrollDriver<T, R, S> {
    window: LocalPagingWindow<T, S>,
    merges: MergeSupervisor<T, R>,
    thresholds: ScrollThresholds,
    resident: Arc<watch::Sender<Vec<u32>>>,
    cancel: CancellationToken,
}

impl<T, R, S> ScrollDriver<T, R, S>
where
    T: Clone + Send + Sync + 'static,
    R: Send + Sync + 'static,
    S: LocalPageStore<T> + 'static,
{
    async fn run<P>(mut self, positions: P)
    where
        P: Stream<Item = usize> + Send,
    {
        let mut positions = pin!(positions);
        let mut last_position = None;

        loop {
            let position = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                next = positions.next() => match next {
                    Some(position) => position,
                    None => break,
                },
            };

            if last_position == Some(position) {
                continue;
            }
            last_position = Some(position);
            self.on_scroll(position).await;
        }

        if self.cancel.is_cancelled() {
            self.merges.shutdown();
        }
        debug!("scroll observation stopped");
    }

    async fn on_scroll(&mut self, position: usize) {
        let action = self.thresholds.decide(position);
        let result = match action {
            ScrollAction::Append => self.window.append_next().await,
            ScrollAction::Prepend => self.window.prepend_previous().await,
            ScrollAction::Hold => return,
        };

        if self.cancel.is_cancelled() {
            return;
        }

        match result {
            Ok(change) if change.is_changed() => {
                debug!(position, ?change, "window moved");
                self.resident.send_replace(self.window.resident_pages());
                self.merges.restart(self.window.feeds());
            }
            Ok(_) => trace!(position, ?action, "window already at edge"),
            Err(err) => error!(
                position,
                error = %err,
                "failed to move local window; keeping resident pages"
            ),
        }
    }
}
