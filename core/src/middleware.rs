//! Middleware and interceptor traits.
//!
//! The host framework's middleware convention is a curried function:
//! `api -> next -> action -> output`. Here each step is a trait method:
//!
//! 1. [`Middleware::attach`] runs once when a store applies the middleware
//!    and receives the store's [`MiddlewareApi`].
//! 2. [`Interceptor::handle`] runs on every dispatch with the chain
//!    continuation and the action.
//!
//! [`wrap`] turns an interceptor and its continuation back into a dispatch
//! handle so interceptors can be layered.

use crate::StoreTypes;
use crate::action::Action;
use crate::api::{Dispatch, MiddlewareApi, Next};
use std::sync::Arc;

/// A composable interceptor factory layered around a store's dispatch
pub trait Middleware<T: StoreTypes>: Send + Sync {
    /// Attach to a store, producing the interceptor used for every dispatch
    fn attach(&self, api: &MiddlewareApi<T>) -> Box<dyn Interceptor<T>>;
}

/// Intercepts actions on their way to the reducer
pub trait Interceptor<T: StoreTypes>: Send + Sync {
    /// Handle one action
    ///
    /// - `next`: The rest of the chain
    /// - `action`: The dispatched action
    ///
    /// Returns the dispatch output, either produced here or by `next`.
    fn handle(&self, next: &Next<T>, action: Action<T>) -> T::Output;
}

impl<T: StoreTypes> Middleware<T> for Box<dyn Middleware<T>> {
    fn attach(&self, api: &MiddlewareApi<T>) -> Box<dyn Interceptor<T>> {
        (**self).attach(api)
    }
}

impl<T: StoreTypes> Middleware<T> for Arc<dyn Middleware<T>> {
    fn attach(&self, api: &MiddlewareApi<T>) -> Box<dyn Interceptor<T>> {
        (**self).attach(api)
    }
}

/// Bind an interceptor to its continuation
///
/// The returned handle calls `interceptor.handle(&next, action)` for every
/// action it receives.
#[must_use]
pub fn wrap<T: StoreTypes>(interceptor: Arc<dyn Interceptor<T>>, next: Next<T>) -> Dispatch<T> {
    Dispatch::new(move |action| interceptor.handle(&next, action))
}

/// Build a middleware from a closure run at attachment
///
/// # Example
///
/// ```
/// use composable_thunk_core::middleware::{from_fn, interceptor_fn};
/// use composable_thunk_core::{Action, Dispatch, GetState, Middleware, MiddlewareApi, StoreTypes, wrap};
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
/// // Doubles every plain action before passing it on
/// let doubler = from_fn(|_api: &MiddlewareApi<Counter>| {
///     interceptor_fn(|next: &Dispatch<Counter>, action: Action<Counter>| match action {
///         Action::Plain(value) => next.plain(value * 2),
///         other => next.dispatch(other),
///     })
/// });
///
/// let api = MiddlewareApi::<Counter>::new(Dispatch::new(|_| 0), GetState::new(|| 0));
/// let handler = wrap(doubler.attach(&api).into(), Dispatch::new(|action: Action<Counter>| {
///     action.into_plain().unwrap_or_default()
/// }));
/// assert_eq!(handler.plain(21), 42);
/// ```
#[must_use]
pub fn from_fn<T, F>(f: F) -> FnMiddleware<F>
where
    T: StoreTypes,
    F: Fn(&MiddlewareApi<T>) -> Box<dyn Interceptor<T>> + Send + Sync,
{
    FnMiddleware { f }
}

/// Build a boxed interceptor from a closure
#[must_use]
pub fn interceptor_fn<T, F>(f: F) -> Box<dyn Interceptor<T>>
where
    T: StoreTypes,
    F: Fn(&Next<T>, Action<T>) -> T::Output + Send + Sync + 'static,
{
    Box::new(FnInterceptor { f })
}

/// Middleware created by [`from_fn`]
pub struct FnMiddleware<F> {
    f: F,
}

impl<T, F> Middleware<T> for FnMiddleware<F>
where
    T: StoreTypes,
    F: Fn(&MiddlewareApi<T>) -> Box<dyn Interceptor<T>> + Send + Sync,
{
    fn attach(&self, api: &MiddlewareApi<T>) -> Box<dyn Interceptor<T>> {
        (self.f)(api)
    }
}

struct FnInterceptor<F> {
    f: F,
}

impl<T, F> Interceptor<T> for FnInterceptor<F>
where
    T: StoreTypes,
    F: Fn(&Next<T>, Action<T>) -> T::Output + Send + Sync,
{
    fn handle(&self, next: &Next<T>, action: Action<T>) -> T::Output {
        (self.f)(next, action)
    }
}
