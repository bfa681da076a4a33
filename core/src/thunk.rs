//! The thunk middleware.
//!
//! Thunk actions are run with `(dispatch, get_state, extra)` and their output
//! is returned as is. Plain actions go to `next` untouched.
//!
//! # Example
//!
//! ```
//! use composable_thunk_core::{Action, Dispatch, ExtraArgument, GetState, Interceptor, Middleware, MiddlewareApi, StoreTypes, with_extra_argument};
//!
//! struct Greeter;
//!
//! impl StoreTypes for Greeter {
//!     type State = String;
//!     type Action = String;
//!     type Extra = String;
//!     type Output = String;
//! }
//!
//! let api = MiddlewareApi::<Greeter>::new(
//!     Dispatch::new(|_| String::new()),
//!     GetState::new(|| "world".to_string()),
//! );
//! let middleware = with_extra_argument(ExtraArgument::<Greeter>::factory(|_dispatch, get_state| {
//!     format!("hello {}", get_state.get())
//! }));
//!
//! let interceptor = middleware.attach(&api);
//! let next = Dispatch::new(|action: Action<Greeter>| action.into_plain().unwrap_or_default());
//!
//! let output = interceptor.handle(&next, Action::<Greeter>::thunk(|_, _, greeting: &String| greeting.clone()));
//! assert_eq!(output, "hello world");
//! ```

use crate::StoreTypes;
use crate::action::Action;
use crate::api::{Dispatch, GetState, MiddlewareApi, Next};
use crate::extra::ExtraArgument;
use crate::middleware::{Interceptor, Middleware};
use std::sync::Arc;

/// Middleware that runs thunk actions
///
/// Holds the unresolved extra argument. Every [`attach`](Middleware::attach)
/// resolves it once against the store it is attached to.
pub struct ThunkMiddleware<T: StoreTypes> {
    extra: ExtraArgument<T>,
}

impl<T> ThunkMiddleware<T>
where
    T: StoreTypes,
    T::Extra: Default,
{
    /// Create a thunk middleware without an extra argument
    ///
    /// Thunks receive `T::Extra::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extra: ExtraArgument::default(),
        }
    }
}

impl<T: StoreTypes> ThunkMiddleware<T> {
    /// Create a thunk middleware with the extra argument bound
    #[must_use]
    pub const fn with_extra_argument(extra: ExtraArgument<T>) -> Self {
        Self { extra }
    }

    /// The extra argument this middleware was built with
    #[must_use]
    pub const fn extra_argument(&self) -> &ExtraArgument<T> {
        &self.extra
    }

    /// Attach to a store without boxing the interceptor
    ///
    /// Resolves the extra argument: a factory is invoked exactly once here.
    #[must_use]
    pub fn interceptor(&self, api: &MiddlewareApi<T>) -> ThunkInterceptor<T> {
        tracing::trace!(factory = self.extra.is_factory(), "Attaching thunk middleware");

        ThunkInterceptor {
            dispatch: api.dispatch.clone(),
            get_state: api.get_state.clone(),
            extra: self.extra.resolve(api),
        }
    }
}

impl<T> Default for ThunkMiddleware<T>
where
    T: StoreTypes,
    T::Extra: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StoreTypes> Clone for ThunkMiddleware<T> {
    fn clone(&self) -> Self {
        Self {
            extra: self.extra.clone(),
        }
    }
}

impl<T: StoreTypes> std::fmt::Debug for ThunkMiddleware<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThunkMiddleware")
            .field("extra", &self.extra)
            .finish()
    }
}

impl<T: StoreTypes> Middleware<T> for ThunkMiddleware<T> {
    fn attach(&self, api: &MiddlewareApi<T>) -> Box<dyn Interceptor<T>> {
        Box::new(self.interceptor(api))
    }
}

/// A thunk middleware attached to one store
///
/// Keeps the store's handles and the resolved extra argument for as long as
/// the store keeps the interceptor.
pub struct ThunkInterceptor<T: StoreTypes> {
    dispatch: Dispatch<T>,
    get_state: GetState<T>,
    extra: Arc<T::Extra>,
}

impl<T: StoreTypes> ThunkInterceptor<T> {
    /// The resolved extra argument handed to every thunk
    #[must_use]
    pub fn extra(&self) -> &T::Extra {
        &self.extra
    }
}

impl<T: StoreTypes> Interceptor<T> for ThunkInterceptor<T> {
    fn handle(&self, next: &Next<T>, action: Action<T>) -> T::Output {
        match action {
            Action::Thunk(thunk) => {
                tracing::trace!("Running thunk action");
                thunk.run(&self.dispatch, &self.get_state, &self.extra)
            },
            plain @ Action::Plain(_) => next.dispatch(plain),
        }
    }
}

impl<T: StoreTypes> std::fmt::Debug for ThunkInterceptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThunkInterceptor")
            .field("dispatch", &self.dispatch)
            .field("get_state", &self.get_state)
            .finish_non_exhaustive()
    }
}

/// Create a thunk middleware, optionally with an extra argument
///
/// `None` behaves like [`thunk`]: thunks receive `T::Extra::default()`.
#[must_use]
pub fn create_thunk_middleware<T>(extra: Option<ExtraArgument<T>>) -> ThunkMiddleware<T>
where
    T: StoreTypes,
    T::Extra: Default,
{
    extra.map_or_else(ThunkMiddleware::new, ThunkMiddleware::with_extra_argument)
}

/// The default thunk middleware
#[must_use]
pub fn thunk<T>() -> ThunkMiddleware<T>
where
    T: StoreTypes,
    T::Extra: Default,
{
    ThunkMiddleware::new()
}

/// A thunk middleware with the given extra argument bound
#[must_use]
pub const fn with_extra_argument<T: StoreTypes>(extra: ExtraArgument<T>) -> ThunkMiddleware<T> {
    ThunkMiddleware::with_extra_argument(extra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct Payload {
        id: u32,
    }

    struct Plain;

    impl StoreTypes for Plain {
        type State = ();
        type Action = Payload;
        type Extra = ();
        type Output = String;
    }

    #[derive(Debug, Default, PartialEq)]
    struct Services {
        label: &'static str,
    }

    struct WithServices;

    impl StoreTypes for WithServices {
        type State = u32;
        type Action = u32;
        type Extra = Services;
        type Output = String;
    }

    struct FromFactory;

    impl StoreTypes for FromFactory {
        type State = u32;
        type Action = u32;
        type Extra = MiddlewareApi<FromFactory>;
        type Output = bool;
    }

    fn plain_api() -> MiddlewareApi<Plain> {
        MiddlewareApi::new(Dispatch::new(|_| String::new()), GetState::new(|| ()))
    }

    fn counting_next<T: StoreTypes>(called: &Arc<AtomicUsize>) -> Next<T>
    where
        T::Output: Default,
    {
        let called = Arc::clone(called);
        Dispatch::new(move |_| {
            called.fetch_add(1, Ordering::SeqCst);
            T::Output::default()
        })
    }

    #[test]
    fn plain_action_goes_to_next_unchanged() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let next = Dispatch::<Plain>::new(move |action| {
            if let Some(payload) = action.into_plain() {
                sink.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(payload);
            }
            "redux".to_string()
        });

        let interceptor = thunk::<Plain>().attach(&plain_api());
        let output = interceptor.handle(&next, Action::plain(Payload { id: 3 }));

        assert_eq!(output, "redux");
        assert_eq!(
            *received.lock().unwrap_or_else(std::sync::PoisonError::into_inner),
            vec![Payload { id: 3 }]
        );
    }

    #[test]
    fn thunk_output_is_returned_and_next_skipped() {
        let called = Arc::new(AtomicUsize::new(0));
        let next = counting_next::<Plain>(&called);

        let interceptor = thunk::<Plain>().attach(&plain_api());
        let output = interceptor.handle(&next, Action::<Plain>::thunk(|_, _, _| "rocks".to_string()));

        assert_eq!(output, "rocks");
        assert_eq!(called.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn thunk_runs_synchronously() {
        let mutated = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&mutated);
        let called = Arc::new(AtomicUsize::new(0));

        let interceptor = thunk::<Plain>().attach(&plain_api());
        let _ = interceptor.handle(
            &counting_next::<Plain>(&called),
            Action::<Plain>::thunk(move |_, _, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                String::new()
            }),
        );

        assert_eq!(mutated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn thunk_receives_store_handles() {
        let api = plain_api();
        let expected = api.clone();
        let called = Arc::new(AtomicUsize::new(0));

        let interceptor = thunk::<Plain>().attach(&api);
        let output = interceptor.handle(
            &counting_next::<Plain>(&called),
            Action::<Plain>::thunk(move |dispatch, get_state, _| {
                assert!(dispatch.same_as(&expected.dispatch));
                assert!(get_state.same_as(&expected.get_state));
                "X".to_string()
            }),
        );

        assert_eq!(output, "X");
    }

    #[test]
    fn static_extra_is_shared_by_every_thunk() {
        let extra = ExtraArgument::<WithServices>::value(Services { label: "lol" });
        let ExtraArgument::Value(expected) = extra.clone() else {
            unreachable!("constructed as a value");
        };
        let api = MiddlewareApi::new(Dispatch::new(|_| String::new()), GetState::new(|| 0));
        let called = Arc::new(AtomicUsize::new(0));
        let next = counting_next::<WithServices>(&called);

        let interceptor = with_extra_argument(extra).attach(&api);
        for _ in 0..3 {
            let expected = Arc::clone(&expected);
            let output = interceptor.handle(
                &next,
                Action::<WithServices>::thunk(move |_, _, services| {
                    assert!(std::ptr::eq(services, &*expected));
                    services.label.to_string()
                }),
            );
            assert_eq!(output, "lol");
        }
    }

    #[test]
    fn absent_extra_is_default() {
        let api = MiddlewareApi::new(Dispatch::new(|_| String::new()), GetState::new(|| 0));
        let interceptor = create_thunk_middleware::<WithServices>(None).interceptor(&api);

        assert_eq!(interceptor.extra(), &Services::default());
    }

    #[test]
    fn factory_runs_once_per_attachment() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let middleware = with_extra_argument(ExtraArgument::<FromFactory>::factory(
            move |dispatch, get_state| {
                counted.fetch_add(1, Ordering::SeqCst);
                MiddlewareApi::new(dispatch.clone(), get_state.clone())
            },
        ));
        let api = MiddlewareApi::new(Dispatch::new(|_| false), GetState::new(|| 0));
        let called = Arc::new(AtomicUsize::new(0));
        let next = counting_next::<FromFactory>(&called);

        let interceptor = middleware.attach(&api);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        for _ in 0..2 {
            let expected = api.clone();
            let matched = interceptor.handle(
                &next,
                Action::<FromFactory>::thunk(move |dispatch, get_state, built| {
                    built.dispatch.same_as(dispatch)
                        && built.get_state.same_as(get_state)
                        && dispatch.same_as(&expected.dispatch)
                }),
            );
            assert!(matched);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let _second = middleware.attach(&api);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn debug_output_names_the_extra_kind() {
        let middleware = thunk::<Plain>();
        assert_eq!(
            format!("{middleware:?}"),
            "ThunkMiddleware { extra: ExtraArgument::Value(<extra>) }"
        );
    }
}
