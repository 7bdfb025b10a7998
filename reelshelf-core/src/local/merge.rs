use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use reelshelf_contracts::PageFeed;
use reelshelf_model::PagerState;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Per-item mapping applied while merging resident pages.
pub type MapFn<T, R> = Arc<dyn Fn(&T) -> R + Send + Sync>;

/// Flatten page snapshots in window order and map every row.
pub(crate) fn merge_snapshots<T, R>(
    snapshots: &[Vec<T>],
    map: &(dyn Fn(&T) -> R + Send + Sync),
) -> Vec<R> {
    snapshots.iter().flatten().map(map).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Liveness {
    Idle,
    Live(u64),
    Closed,
}

/// Owner of the observable [`PagerState`].
///
/// Only the merge pipeline whose generation is currently live may publish.
/// Switching or closing the generation happens under the same lock as
/// publishing, so once [`Self::activate`] or [`Self::close`] returns no
/// superseded pipeline can emit again. Closing is final.
pub(crate) struct StatePublisher<R> {
    state: watch::Sender<PagerState<R>>,
    liveness: Mutex<Liveness>,
}

impl<R> StatePublisher<R> {
    pub(crate) fn new() -> (Self, watch::Receiver<PagerState<R>>) {
        let (state, receiver) = watch::channel(PagerState::Loading);
        let publisher = Self {
            state,
            liveness: Mutex::new(Liveness::Idle),
        };
        (publisher, receiver)
    }

    fn liveness(&self) -> MutexGuard<'_, Liveness> {
        match self.liveness.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Hand the publishing right to `generation`. Returns `false` once closed.
    pub(crate) fn activate(&self, generation: u64) -> bool {
        let mut liveness = self.liveness();
        if *liveness == Liveness::Closed {
            return false;
        }
        *liveness = Liveness::Live(generation);
        true
    }

    pub(crate) fn close(&self) {
        *self.liveness() = Liveness::Closed;
    }

    pub(crate) fn is_closed(&self) -> bool {
        *self.liveness() == Liveness::Closed
    }

    /// Publish `state` on behalf of `generation`; stale generations are
    /// silently dropped.
    pub(crate) fn publish(&self, generation: u64, state: PagerState<R>) -> bool {
        let liveness = self.liveness();
        if *liveness != Liveness::Live(generation) {
            return false;
        }
        self.state.send_replace(state);
        true
    }

    /// Publish a failure unless the controller was already invalidated.
    pub(crate) fn fail(&self, reason: String) {
        let liveness = self.liveness();
        if *liveness == Liveness::Closed {
            return;
        }
        self.state.send_replace(PagerState::Failed { reason });
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<PagerState<R>> {
        self.state.subscribe()
    }
}

struct ActiveMerge {
    generation: u64,
    token: CancellationToken,
    task: JoinHandle<()>,
}

/// Keeps at most one merge pipeline alive, replacing it wholesale on every
/// window change.
pub(crate) struct MergeSupervisor<T, R> {
    parent: CancellationToken,
    publisher: Arc<StatePublisher<R>>,
    map: MapFn<T, R>,
    generation: u64,
    active: Option<ActiveMerge>,
}

impl<T, R> fmt::Debug for MergeSupervisor<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeSupervisor")
            .field("generation", &self.generation)
            .field(
                "active",
                &self.active.as_ref().map(|active| active.generation),
            )
            .field("cancelled", &self.parent.is_cancelled())
            .finish()
    }
}

impl<T, R> MergeSupervisor<T, R>
where
    T: Clone + Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    pub(crate) fn new(
        parent: CancellationToken,
        publisher: Arc<StatePublisher<R>>,
        map: MapFn<T, R>,
    ) -> Self {
        Self {
            parent,
            publisher,
            map,
            generation: 0,
            active: None,
        }
    }

    /// Cancel the running pipeline (if any) and start a fresh one over
    /// `feeds`.
    pub(crate) fn restart(&mut self, feeds: Vec<PageFeed<T>>) {
        if let Some(previous) = self.active.take() {
            previous.token.cancel();
            trace!(generation = previous.generation, "merge pipeline cancelled");
        }

        self.generation += 1;
        let generation = self.generation;
        if self.parent.is_cancelled() || !self.publisher.activate(generation) {
            debug!(generation, "controller invalidated; merge pipeline not restarted");
            return;
        }

        let token = self.parent.child_token();
        let task = tokio::spawn(run_merge(
            generation,
            feeds,
            Arc::clone(&self.map),
            Arc::clone(&self.publisher),
            token.clone(),
        ));

        debug!(generation, "merge pipeline started");
        self.active = Some(ActiveMerge {
            generation,
            token,
            task,
        });
    }

    /// Stop the running pipeline without starting another.
    pub(crate) fn shutdown(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
            active.task.abort();
        }
    }
}

async fn run_merge<T, R>(
    generation: u64,
    mut feeds: Vec<PageFeed<T>>,
    map: MapFn<T, R>,
    publisher: Arc<StatePublisher<R>>,
    token: CancellationToken,
) where
    T: Clone + Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    let mut snapshots: Vec<Vec<T>> = feeds
        .iter_mut()
        .map(|feed| feed.borrow_and_update().clone())
        .collect();

    if token.is_cancelled() {
        return;
    }
    publisher.publish(
        generation,
        PagerState::Loaded(Arc::new(merge_snapshots(&snapshots, map.as_ref()))),
    );

    let updates: Vec<BoxStream<'static, (usize, Vec<T>)>> = feeds
        .into_iter()
        .enumerate()
        .map(|(index, feed)| {
            WatchStream::from_changes(feed)
                .map(move |rows| (index, rows))
                .boxed()
        })
        .collect();
    let mut updates = stream::select_all(updates);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            next = updates.next() => match next {
                Some((index, rows)) => {
                    snapshots[index] = rows;
                    let merged = merge_snapshots(&snapshots, map.as_ref());
                    trace!(generation, page_index = index, items = merged.len(), "resident page changed");
                    if !publisher.publish(generation, PagerState::Loaded(Arc::new(merged))) {
                        break;
                    }
                }
                None => {
                    // Every feed closed; nothing left to observe.
                    token.cancelled().await;
                    break;
                }
            },
        }
    }

    trace!(generation, "merge pipeline finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_flattens_in_window_order() {
        let snapshots = vec![vec![1, 2], vec![], vec![3]];
        let merged = merge_snapshots(&snapshots, &|row: &i32| row * 10);
        assert_eq!(merged, vec![10, 20, 30]);
    }

    #[test]
    fn stale_generation_cannot_publish() {
        let (publisher, receiver) = StatePublisher::<u8>::new();
        publisher.activate(1);
        assert!(publisher.publish(1, PagerState::Loaded(Arc::new(vec![1]))));

        publisher.activate(2);
        assert!(!publisher.publish(1, PagerState::Loaded(Arc::new(vec![9]))));
        assert_eq!(receiver.borrow().items(), Some(&[1u8][..]));

        publisher.close();
        assert!(!publisher.publish(2, PagerState::Loaded(Arc::new(vec![2]))));
        assert!(!publisher.activate(3));
        publisher.fail("late".into());
        assert!(receiver.borrow().is_loaded());
    }
}
