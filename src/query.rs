//! Background loads polled from the UI tick.
//!
//! A `Query<T>` owns a fetcher closure and runs it on a spawned task. The
//! result comes back over a channel and is picked up by `poll()` on the next
//! tick, so the event loop never awaits a network call.
//!
//! Loads are single-flight: `fetch()` while loading does nothing, and
//! `refetch()` starts a new generation whose result supersedes any load
//! still in flight. The superseded task is aborted so its side effects (such
//! as writing a snapshot) never land after the newer load's.
//!
//! ```ignore
//! let client = deals_client.clone();
//! let mut query = Query::new(move || {
//!   let client = client.clone();
//!   async move { Ok(client.load(LoadMode::CacheFirst).await) }
//! });
//!
//! query.fetch();
//!
//! // on tick
//! if query.poll() {
//!   // state changed, redraw
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum QueryState<T> {
  Idle,
  Loading,
  Success(T),
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<T> + Send + Sync>;

/// Sequence number of a load request
pub type Generation = u64;

pub struct Query<T> {
  state: QueryState<T>,
  fetcher: FetcherFn<T>,
  generation: Generation,
  sender: mpsc::UnboundedSender<(Generation, Result<T, String>)>,
  receiver: mpsc::UnboundedReceiver<(Generation, Result<T, String>)>,
  /// Task running the current generation
  task: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Query<T> {
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    let (sender, receiver) = mpsc::unbounded_channel();
    Self {
      state: QueryState::Idle,
      fetcher: Box::new(move || Box::pin(fetcher())),
      generation: 0,
      sender,
      receiver,
      task: None,
    }
  }

  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  pub fn generation(&self) -> Generation {
    self.generation
  }

  /// Start a load unless one is already running.
  pub fn fetch(&mut self) {
    if self.state.is_loading() {
      return;
    }
    self.start_fetch();
  }

  /// Start a new generation; any load still in flight is superseded.
  pub fn refetch(&mut self) {
    self.start_fetch();
  }

  /// Take the result of the current generation if it has arrived.
  ///
  /// Returns `true` when the state changed.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Ok((generation, result)) = self.receiver.try_recv() {
      if generation != self.generation {
        debug!(generation, current = self.generation, "discarding stale load");
        continue;
      }
      self.state = match result {
        Ok(data) => QueryState::Success(data),
        Err(e) => QueryState::Error(e),
      };
      changed = true;
    }
    changed
  }

  fn start_fetch(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
    self.generation += 1;
    self.state = QueryState::Loading;

    let generation = self.generation;
    let sender = self.sender.clone();
    let future = (self.fetcher)();
    self.task = Some(tokio::spawn(async move {
      let result = future.await;
      let _ = sender.send((generation, result));
    }));
  }
}

impl<T> Drop for Query<T> {
  fn drop(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .field("generation", &self.generation)
      .finish_non_exhaustive()
  }
}
