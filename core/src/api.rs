//! Handles supplied by the host store.
//!
//! The host store owns its dispatch entry point and its state. Middleware only
//! ever sees them through the shared handles defined here, which are cheap to
//! clone and can be compared by identity with `same_as`.

use crate::StoreTypes;
use crate::action::Action;
use std::sync::Arc;

type DispatchFn<T> = dyn Fn(Action<T>) -> <T as StoreTypes>::Output + Send + Sync;

type GetStateFn<T> = dyn Fn() -> <T as StoreTypes>::State + Send + Sync;

/// A shared dispatch handle
///
/// Used both for the store's full dispatch (which re-enters the whole
/// middleware chain) and for the chain continuation [`Next`].
///
/// # Example
///
/// ```
/// use composable_thunk_core::{Dispatch, StoreTypes};
///
/// struct Counter;
///
/// impl StoreTypes for Counter {
///     type State = i64;
///     type Action = i64;
///     type Extra = ();
///     type Output = i64;
/// }
///
/// let dispatch = Dispatch::<Counter>::new(|action| action.into_plain().unwrap_or_default());
/// assert_eq!(dispatch.plain(7), 7);
/// assert!(dispatch.same_as(&dispatch.clone()));
/// ```
pub struct Dispatch<T: StoreTypes> {
    inner: Arc<DispatchFn<T>>,
}

/// The continuation of a middleware chain
///
/// Calling it hands the action to the next middleware, or to the store's
/// reducer when the caller is the innermost middleware.
pub type Next<T> = Dispatch<T>;

impl<T: StoreTypes> Dispatch<T> {
    /// Create a dispatch handle from a closure
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Action<T>) -> T::Output + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Dispatch an action, returning whatever the chain returns
    pub fn dispatch(&self, action: Action<T>) -> T::Output {
        (self.inner)(action)
    }

    /// Dispatch a plain action
    pub fn plain(&self, action: T::Action) -> T::Output {
        self.dispatch(Action::Plain(action))
    }

    /// Dispatch a thunk built from a closure
    pub fn thunk<F>(&self, f: F) -> T::Output
    where
        F: FnOnce(&Self, &GetState<T>, &T::Extra) -> T::Output + Send + 'static,
    {
        self.dispatch(Action::thunk(f))
    }

    /// Check if both handles point at the same dispatch function
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: StoreTypes> Clone for Dispatch<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: StoreTypes> std::fmt::Debug for Dispatch<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Dispatch(<fn>)")
    }
}

/// A shared state-read handle
pub struct GetState<T: StoreTypes> {
    inner: Arc<GetStateFn<T>>,
}

impl<T: StoreTypes> GetState<T> {
    /// Create a state-read handle from a closure
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> T::State + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Read the current state
    #[must_use]
    pub fn get(&self) -> T::State {
        (self.inner)()
    }

    /// Check if both handles point at the same state-read function
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: StoreTypes> Clone for GetState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: StoreTypes> std::fmt::Debug for GetState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GetState(<fn>)")
    }
}

/// The `{dispatch, get_state}` pair handed to middleware at attachment
///
/// Owned by the host store. Middleware may clone the handles and keep them
/// for as long as it lives.
pub struct MiddlewareApi<T: StoreTypes> {
    /// The store's full dispatch, re-entering the whole middleware chain
    pub dispatch: Dispatch<T>,

    /// Reads the store's current state
    pub get_state: GetState<T>,
}

impl<T: StoreTypes> MiddlewareApi<T> {
    /// Bundle a dispatch handle and a state-read handle
    #[must_use]
    pub const fn new(dispatch: Dispatch<T>, get_state: GetState<T>) -> Self {
        Self {
            dispatch,
            get_state,
        }
    }
}

impl<T: StoreTypes> Clone for MiddlewareApi<T> {
    fn clone(&self) -> Self {
        Self {
            dispatch: self.dispatch.clone(),
            get_state: self.get_state.clone(),
        }
    }
}

impl<T: StoreTypes> std::fmt::Debug for MiddlewareApi<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareApi")
            .field("dispatch", &self.dispatch)
            .field("get_state", &self.get_state)
            .finish()
    }
}
