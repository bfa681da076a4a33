//! In-memory host store for middleware tests
//!
//! [`MockStore`] plays the part of the state container the middleware is
//! attached to: it owns the state, runs a reducer closure for plain actions
//! and wires middleware the way the framework's `applyMiddleware` does. The
//! `dispatch` handle given to middleware re-enters the whole chain.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use composable_thunk_core::{
    Action, Dispatch, GetState, Middleware, MiddlewareApi, StoreTypes, chain,
};
use std::sync::{Arc, Mutex, OnceLock};

type ReducerFn<T> =
    dyn Fn(&mut <T as StoreTypes>::State, <T as StoreTypes>::Action) -> <T as StoreTypes>::Output
        + Send
        + Sync;

/// A host store with a middleware chain in front of a reducer closure
///
/// Plain actions that reach the reducer are recorded and can be read back with
/// [`reduced_actions`](Self::reduced_actions).
///
/// # Panics
///
/// Like the framework it stands in for, the store panics when:
/// - middleware dispatches while it is still being attached
/// - a `dispatch` handle is used after the store was dropped
/// - a thunk reaches the reducer (no thunk middleware in the chain)
pub struct MockStore<T: StoreTypes> {
    state: Arc<Mutex<T::State>>,
    reduced: Arc<Mutex<Vec<T::Action>>>,
    api: MiddlewareApi<T>,
    wired: Arc<OnceLock<Dispatch<T>>>,
}

impl<T> MockStore<T>
where
    T: StoreTypes,
    T::State: Clone + Send,
    T::Action: Clone,
{
    /// Create a store with no middleware
    #[must_use]
    pub fn new<R>(initial_state: T::State, reducer: R) -> Self
    where
        R: Fn(&mut T::State, T::Action) -> T::Output + Send + Sync + 'static,
    {
        Self::with_middleware(initial_state, reducer, Vec::new())
    }

    /// Create a store and apply middleware
    ///
    /// Middleware is attached in list order; the first entry sees every
    /// dispatched action first.
    #[must_use]
    pub fn with_middleware<R>(
        initial_state: T::State,
        reducer: R,
        middlewares: Vec<Box<dyn Middleware<T>>>,
    ) -> Self
    where
        R: Fn(&mut T::State, T::Action) -> T::Output + Send + Sync + 'static,
    {
        let state = Arc::new(Mutex::new(initial_state));
        let reduced = Arc::new(Mutex::new(Vec::new()));
        let reducer: Arc<ReducerFn<T>> = Arc::new(reducer);

        let base = {
            let state = Arc::clone(&state);
            let reduced = Arc::clone(&reduced);
            Dispatch::new(move |action: Action<T>| match action {
                Action::Plain(plain) => {
                    tracing::trace!("Reducing plain action");
                    reduced.lock().unwrap().push(plain.clone());
                    let mut state = state.lock().unwrap();
                    reducer(&mut *state, plain)
                },
                #[allow(clippy::panic)] // Mirrors the framework rejecting non-plain actions
                Action::Thunk(_) => {
                    panic!("Thunk reached the reducer: apply the thunk middleware to dispatch thunks")
                },
            })
        };

        let wired: Arc<OnceLock<Dispatch<T>>> = Arc::new(OnceLock::new());
        let api = {
            let wired = Arc::downgrade(&wired);
            let state = Arc::clone(&state);
            MiddlewareApi::new(
                Dispatch::new(move |action| {
                    #[allow(clippy::panic)] // No store left to dispatch into
                    let Some(wired) = wired.upgrade() else {
                        panic!("Dispatching after the store was dropped: the handle outlived its store")
                    };
                    match wired.get() {
                        Some(dispatch) => dispatch.dispatch(action),
                        #[allow(clippy::panic)] // Mirrors the framework's setup guard
                        None => panic!(
                            "Dispatching while constructing your middleware is not allowed. \
                             Other middleware would not be applied to this dispatch."
                        ),
                    }
                }),
                GetState::new(move || state.lock().unwrap().clone()),
            )
        };

        let _ = wired.set(chain(&middlewares, &api, base));
        tracing::debug!(middlewares = middlewares.len(), "Mock store ready");

        Self {
            state,
            reduced,
            api,
            wired,
        }
    }

    fn wired(&self) -> &Dispatch<T> {
        // Set in the constructor before the store is returned
        self.wired.get().unwrap()
    }

    /// Dispatch an action through the middleware chain
    pub fn dispatch(&self, action: Action<T>) -> T::Output {
        self.wired().dispatch(action)
    }

    /// Dispatch a plain action
    pub fn plain(&self, action: T::Action) -> T::Output {
        self.wired().plain(action)
    }

    /// Dispatch a thunk built from a closure
    pub fn thunk<F>(&self, f: F) -> T::Output
    where
        F: FnOnce(&Dispatch<T>, &GetState<T>, &T::Extra) -> T::Output + Send + 'static,
    {
        self.wired().thunk(f)
    }

    /// A clone of the current state
    #[must_use]
    pub fn state(&self) -> T::State {
        self.state.lock().unwrap().clone()
    }

    /// The handles given to middleware at attachment
    #[must_use]
    pub fn api(&self) -> MiddlewareApi<T> {
        self.api.clone()
    }

    /// Every plain action that reached the reducer, in order
    #[must_use]
    pub fn reduced_actions(&self) -> Vec<T::Action> {
        self.reduced.lock().unwrap().clone()
    }
}

impl<T: StoreTypes> std::fmt::Debug for MockStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
