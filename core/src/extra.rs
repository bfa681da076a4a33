//! The extra argument handed to every thunk.
//!
//! Either a static value shared by every attachment, or a factory invoked once
//! per attachment with the store's `dispatch` and `get_state` handles. The
//! factory form lets callers build collaborators that close over the store
//! they are attached to, such as API clients that dispatch their own results.

use crate::StoreTypes;
use crate::api::{Dispatch, GetState, MiddlewareApi};
use std::sync::Arc;

/// Builds an extra argument from the store's handles
pub type ExtraFactory<T> =
    dyn Fn(&Dispatch<T>, &GetState<T>) -> <T as StoreTypes>::Extra + Send + Sync;

/// Static or lazily built extra argument
///
/// # Example
///
/// ```
/// use composable_thunk_core::{Dispatch, ExtraArgument, GetState, MiddlewareApi, StoreTypes};
///
/// struct Counter;
///
/// impl StoreTypes for Counter {
///     type State = i64;
///     type Action = i64;
///     type Extra = String;
///     type Output = ();
/// }
///
/// let api = MiddlewareApi::<Counter>::new(Dispatch::new(|_| ()), GetState::new(|| 3));
///
/// let fixed = ExtraArgument::<Counter>::value("static".to_string());
/// assert_eq!(fixed.resolve(&api).as_str(), "static");
///
/// let built = ExtraArgument::<Counter>::factory(|_dispatch, get_state| format!("state={}", get_state.get()));
/// assert_eq!(built.resolve(&api).as_str(), "state=3");
/// ```
pub enum ExtraArgument<T: StoreTypes> {
    /// Handed to thunks as is
    Value(Arc<T::Extra>),

    /// Invoked once per attachment; its result is handed to thunks
    Factory(Arc<ExtraFactory<T>>),
}

impl<T: StoreTypes> ExtraArgument<T> {
    /// Wrap a static value
    #[must_use]
    pub fn value(extra: T::Extra) -> Self {
        Self::Value(Arc::new(extra))
    }

    /// Wrap a factory
    #[must_use]
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&Dispatch<T>, &GetState<T>) -> T::Extra + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(f))
    }

    /// Check if the extra argument is built by a factory
    #[must_use]
    pub const fn is_factory(&self) -> bool {
        matches!(self, Self::Factory(_))
    }

    /// Produce the value thunks receive
    ///
    /// A `Value` is shared, not copied: every call returns the same
    /// allocation. A `Factory` is invoked on every call, so callers resolve
    /// once per attachment and keep the result.
    #[must_use]
    pub fn resolve(&self, api: &MiddlewareApi<T>) -> Arc<T::Extra> {
        match self {
            Self::Value(extra) => Arc::clone(extra),
            Self::Factory(factory) => {
                tracing::trace!("Resolving extra argument from factory");
                Arc::new(factory(&api.dispatch, &api.get_state))
            },
        }
    }
}

impl<T: StoreTypes> Clone for ExtraArgument<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(extra) => Self::Value(Arc::clone(extra)),
            Self::Factory(factory) => Self::Factory(Arc::clone(factory)),
        }
    }
}

impl<T> Default for ExtraArgument<T>
where
    T: StoreTypes,
    T::Extra: Default,
{
    fn default() -> Self {
        Self::value(T::Extra::default())
    }
}

impl<T: StoreTypes> std::fmt::Debug for ExtraArgument<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(_) => write!(f, "ExtraArgument::Value(<extra>)"),
            Self::Factory(_) => write!(f, "ExtraArgument::Factory(<factory>)"),
        }
    }
}
