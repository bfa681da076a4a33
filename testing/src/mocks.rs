//! Mock host-side handles
//!
//! - [`RecordingNext`]: A `next` continuation that records every action it receives
//! - [`StubApi`]: A [`MiddlewareApi`] whose handles count their calls

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use composable_thunk_core::{Action, Dispatch, GetState, MiddlewareApi, Next, StoreTypes};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What reached a [`RecordingNext`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received<A> {
    /// A plain action, cloned before the output was computed
    Plain(A),

    /// A thunk, which the thunk middleware should have consumed
    Thunk,
}

/// A `next` continuation that records what it receives
///
/// # Example
///
/// ```
/// use composable_thunk_core::{Action, StoreTypes};
/// use composable_thunk_testing::{Received, RecordingNext};
///
/// struct Counter;
///
/// impl StoreTypes for Counter {
///     type State = i64;
///     type Action = i64;
///     type Extra = ();
///     type Output = &'static str;
/// }
///
/// let recorder = RecordingNext::<Counter>::returning(|_| "redux");
/// assert_eq!(recorder.next().plain(5), "redux");
/// assert_eq!(recorder.received(), vec![Received::Plain(5)]);
/// ```
pub struct RecordingNext<T: StoreTypes> {
    received: Arc<Mutex<Vec<Received<T::Action>>>>,
    next: Next<T>,
}

impl<T> RecordingNext<T>
where
    T: StoreTypes,
    T::Action: Clone,
{
    /// Record every action and answer with `output`
    #[must_use]
    pub fn returning<F>(output: F) -> Self
    where
        F: Fn(&Action<T>) -> T::Output + Send + Sync + 'static,
    {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);

        let next = Dispatch::new(move |action: Action<T>| {
            let entry = match &action {
                Action::Plain(plain) => Received::Plain(plain.clone()),
                Action::Thunk(_) => Received::Thunk,
            };
            sink.lock().unwrap().push(entry);
            output(&action)
        });

        Self { received, next }
    }

    /// The continuation to hand to an interceptor
    #[must_use]
    pub fn next(&self) -> Next<T> {
        self.next.clone()
    }

    /// Everything received so far, in order
    #[must_use]
    pub fn received(&self) -> Vec<Received<T::Action>> {
        self.received.lock().unwrap().clone()
    }

    /// Number of actions received so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

impl<T> RecordingNext<T>
where
    T: StoreTypes,
    T::Action: Clone,
    T::Output: Default,
{
    /// Record every action and answer with `T::Output::default()`
    #[must_use]
    pub fn new() -> Self {
        Self::returning(|_| T::Output::default())
    }
}

impl<T> Default for RecordingNext<T>
where
    T: StoreTypes,
    T::Action: Clone,
    T::Output: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

/// `dispatch` / `get_state` handles that count their calls
pub struct StubApi<T: StoreTypes> {
    api: MiddlewareApi<T>,
    dispatch_calls: Arc<AtomicUsize>,
    get_state_calls: Arc<AtomicUsize>,
}

impl<T: StoreTypes> StubApi<T> {
    /// The handles to give to a middleware
    #[must_use]
    pub fn api(&self) -> MiddlewareApi<T> {
        self.api.clone()
    }

    /// Number of times `dispatch` was called
    #[must_use]
    pub fn dispatch_calls(&self) -> usize {
        self.dispatch_calls.load(Ordering::SeqCst)
    }

    /// Number of times `get_state` was called
    #[must_use]
    pub fn get_state_calls(&self) -> usize {
        self.get_state_calls.load(Ordering::SeqCst)
    }
}

/// Create stub handles returning a fixed state and a fixed dispatch output
///
/// # Example
///
/// ```
/// use composable_thunk_core::StoreTypes;
/// use composable_thunk_testing::stub_api;
///
/// struct Counter;
///
/// impl StoreTypes for Counter {
///     type State = i64;
///     type Action = i64;
///     type Extra = ();
///     type Output = &'static str;
/// }
///
/// let stub = stub_api::<Counter, _>(3, || "dispatched");
/// let api = stub.api();
///
/// assert_eq!(api.get_state.get(), 3);
/// assert_eq!(api.dispatch.plain(1), "dispatched");
/// assert_eq!(stub.get_state_calls(), 1);
/// assert_eq!(stub.dispatch_calls(), 1);
/// ```
pub fn stub_api<T, F>(state: T::State, output: F) -> StubApi<T>
where
    T: StoreTypes,
    T::State: Clone + Send + Sync,
    F: Fn() -> T::Output + Send + Sync + 'static,
{
    let dispatch_calls = Arc::new(AtomicUsize::new(0));
    let get_state_calls = Arc::new(AtomicUsize::new(0));

    let dispatched = Arc::clone(&dispatch_calls);
    let dispatch = Dispatch::new(move |_action| {
        dispatched.fetch_add(1, Ordering::SeqCst);
        output()
    });

    let read = Arc::clone(&get_state_calls);
    let get_state = GetState::new(move || {
        read.fetch_add(1, Ordering::SeqCst);
        state.clone()
    });

    StubApi {
        api: MiddlewareApi::new(dispatch, get_state),
        dispatch_calls,
        get_state_calls,
    }
}
