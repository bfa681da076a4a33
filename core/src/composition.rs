//! Middleware composition utilities
//!
//! [`chain`] layers a list of middleware around a base dispatch the same way
//! the host framework's `applyMiddleware` does:
//!
//! ```text
//! dispatch ──▶ middlewares[0] ──▶ middlewares[1] ──▶ ... ──▶ base
//! ```
//!
//! Every middleware is attached against the same [`MiddlewareApi`], in list
//! order, before any action flows.
//!
//! # Examples
//!
//! ```
//! use composable_thunk_core::{Action, Dispatch, GetState, Middleware, MiddlewareApi, StoreTypes, chain, thunk};
//!
//! struct Counter;
//!
//! impl StoreTypes for Counter {
//!     type State = i64;
//!     type Action = i64;
//!     type Extra = ();
//!     type Output = i64;
//! }
//!
//! let api = MiddlewareApi::<Counter>::new(Dispatch::new(|_| 0), GetState::new(|| 10));
//! let middlewares: Vec<Box<dyn Middleware<Counter>>> = vec![Box::new(thunk::<Counter>())];
//! let base = Dispatch::new(|action: Action<Counter>| action.into_plain().unwrap_or_default());
//!
//! let dispatch = chain(&middlewares, &api, base);
//! assert_eq!(dispatch.plain(3), 3);
//! assert_eq!(dispatch.thunk(|_, get_state, _| get_state.get() * 2), 20);
//! ```

use crate::StoreTypes;
use crate::api::{Dispatch, MiddlewareApi, Next};
use crate::middleware::{Interceptor, Middleware, wrap};
use std::sync::Arc;

/// Attach every middleware and layer them around `base`
///
/// The first middleware in the list becomes the outermost interceptor and sees
/// every action first. `base` is the innermost continuation, usually the
/// store's reducer entry point.
///
/// # Type Parameters
///
/// - `T`: The store's associated types
/// - `M`: The middleware handle (`Box<dyn Middleware<T>>`, `Arc<...>` or a concrete type)
#[must_use]
pub fn chain<T, M>(middlewares: &[M], api: &MiddlewareApi<T>, base: Next<T>) -> Dispatch<T>
where
    T: StoreTypes,
    M: Middleware<T>,
{
    tracing::debug!(count = middlewares.len(), "Attaching middleware chain");

    let interceptors: Vec<Arc<dyn Interceptor<T>>> = middlewares
        .iter()
        .map(|middleware| Arc::from(middleware.attach(api)))
        .collect();

    interceptors
        .into_iter()
        .rev()
        .fold(base, |next, interceptor| wrap(interceptor, next))
}
