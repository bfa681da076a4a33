//! # Composable Thunk Core
//!
//! Thunk middleware for unidirectional-data-flow state containers.
//!
//! A store configured with this middleware accepts two kinds of actions:
//! ordinary values, which continue down the middleware chain untouched, and
//! thunks, which are run immediately with the store's `dispatch` handle, its
//! `get_state` handle and an injected extra argument.
//!
//! ## Core Concepts
//!
//! - **StoreTypes**: The associated types of one store (state, plain action, extra argument, output)
//! - **Action**: Either a plain action or a [`ThunkAction`](action::ThunkAction)
//! - **MiddlewareApi**: The `dispatch` / `get_state` pair handed to middleware by the host store
//! - **Middleware**: Attached once per store, produces an [`Interceptor`](middleware::Interceptor)
//! - **ExtraArgument**: A static value, or a factory resolved once at attachment
//!
//! ## Example
//!
//! ```
//! use composable_thunk_core::{Action, Dispatch, GetState, Interceptor, Middleware, MiddlewareApi, StoreTypes, thunk};
//!
//! struct Counter;
//!
//! impl StoreTypes for Counter {
//!     type State = i64;
//!     type Action = &'static str;
//!     type Extra = ();
//!     type Output = String;
//! }
//!
//! let api = MiddlewareApi::<Counter>::new(
//!     Dispatch::<Counter>::new(|_action| String::from("dispatched")),
//!     GetState::<Counter>::new(|| 41),
//! );
//! let interceptor = thunk::<Counter>().attach(&api);
//! let next = Dispatch::<Counter>::new(|action| format!("{action:?}"));
//!
//! let output = interceptor.handle(&next, Action::<Counter>::thunk(|_dispatch, get_state, _extra| {
//!     (get_state.get() + 1).to_string()
//! }));
//! assert_eq!(output, "42");
//!
//! let output = interceptor.handle(&next, Action::plain("increment"));
//! assert_eq!(output, "Plain(\"increment\")");
//! ```

/// Host-provided handles: dispatch, state reads and the chain continuation
pub mod api;

/// Middleware chaining in the host framework's convention
pub mod composition;

/// Extra argument injected into every thunk
pub mod extra;

/// Middleware and interceptor traits
pub mod middleware;

/// Thunk middleware with a mandatory service factory
pub mod service;

/// The thunk middleware
pub mod thunk;

/// Associated types of a single store
///
/// Every handle, action and middleware in this crate is generic over one
/// `StoreTypes` implementation, so a store's state, plain action, extra
/// argument and dispatch output travel together.
///
/// # Example
///
/// ```
/// use composable_thunk_core::StoreTypes;
///
/// struct TodoStore;
///
/// impl StoreTypes for TodoStore {
///     type State = Vec<String>;
///     type Action = String;
///     type Extra = ();
///     type Output = usize;
/// }
/// ```
pub trait StoreTypes: Sized + 'static {
    /// The state returned by `get_state`
    type State: 'static;

    /// Plain (non-thunk) actions understood by the store's reducer
    type Action: Send + 'static;

    /// The extra argument handed to every thunk
    type Extra: Send + Sync + 'static;

    /// The value returned by `dispatch`
    ///
    /// Thunks and the rest of the chain must agree on it. It may be a deferred
    /// value such as a boxed future; middleware never awaits it.
    type Output: 'static;
}

/// Action module - plain actions and thunks
///
/// An [`Action`] is what the host store's `dispatch` accepts. The thunk
/// middleware branches on the variant instead of inspecting values at runtime.
pub mod action {
    use super::StoreTypes;
    use crate::api::{Dispatch, GetState};

    type ThunkFn<T> = Box<
        dyn FnOnce(
                &Dispatch<T>,
                &GetState<T>,
                &<T as StoreTypes>::Extra,
            ) -> <T as StoreTypes>::Output
            + Send,
    >;

    /// A deferred computation run by the thunk middleware
    ///
    /// The closure receives the store's `dispatch` handle, its `get_state`
    /// handle and the resolved extra argument. It runs at most once.
    pub struct ThunkAction<T: StoreTypes> {
        run: ThunkFn<T>,
    }

    impl<T: StoreTypes> ThunkAction<T> {
        /// Wrap a closure as a thunk
        #[must_use]
        pub fn new<F>(f: F) -> Self
        where
            F: FnOnce(&Dispatch<T>, &GetState<T>, &T::Extra) -> T::Output + Send + 'static,
        {
            Self { run: Box::new(f) }
        }

        /// Run the thunk, returning whatever it returns
        pub fn run(self, dispatch: &Dispatch<T>, get_state: &GetState<T>, extra: &T::Extra) -> T::Output {
            (self.run)(dispatch, get_state, extra)
        }
    }

    impl<T: StoreTypes> std::fmt::Debug for ThunkAction<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "ThunkAction(<thunk>)")
        }
    }

    /// A value submitted to the store's dispatch entry point
    ///
    /// # Example
    ///
    /// ```
    /// use composable_thunk_core::{Action, StoreTypes};
    ///
    /// struct Counter;
    ///
    /// impl StoreTypes for Counter {
    ///     type State = i64;
    ///     type Action = &'static str;
    ///     type Extra = ();
    ///     type Output = ();
    /// }
    ///
    /// let plain = Action::<Counter>::plain("increment");
    /// assert!(!plain.is_thunk());
    ///
    /// let deferred = Action::<Counter>::thunk(|dispatch, _get_state, _extra| {
    ///     dispatch.plain("increment");
    /// });
    /// assert!(deferred.is_thunk());
    /// ```
    pub enum Action<T: StoreTypes> {
        /// An ordinary action, forwarded down the chain
        Plain(T::Action),

        /// A deferred computation, run by the thunk middleware
        Thunk(ThunkAction<T>),
    }

    impl<T: StoreTypes> Action<T> {
        /// Create a plain action
        #[must_use]
        pub const fn plain(action: T::Action) -> Self {
            Self::Plain(action)
        }

        /// Create a thunk action from a closure
        #[must_use]
        pub fn thunk<F>(f: F) -> Self
        where
            F: FnOnce(&Dispatch<T>, &GetState<T>, &T::Extra) -> T::Output + Send + 'static,
        {
            Self::Thunk(ThunkAction::new(f))
        }

        /// Check if this is a thunk
        #[must_use]
        pub const fn is_thunk(&self) -> bool {
            matches!(self, Self::Thunk(_))
        }

        /// Borrow the plain action, if any
        #[must_use]
        pub const fn as_plain(&self) -> Option<&T::Action> {
            match self {
                Self::Plain(action) => Some(action),
                Self::Thunk(_) => None,
            }
        }

        /// Take the plain action, if any
        #[must_use]
        pub fn into_plain(self) -> Option<T::Action> {
            match self {
                Self::Plain(action) => Some(action),
                Self::Thunk(_) => None,
            }
        }
    }

    impl<T: StoreTypes> From<ThunkAction<T>> for Action<T> {
        fn from(thunk: ThunkAction<T>) -> Self {
            Self::Thunk(thunk)
        }
    }

    // Manual Debug implementation since thunks don't implement Debug
    impl<T> std::fmt::Debug for Action<T>
    where
        T: StoreTypes,
        T::Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Plain(action) => f.debug_tuple("Plain").field(action).finish(),
                Self::Thunk(_) => write!(f, "Thunk(<thunk>)"),
            }
        }
    }
}

// Re-export commonly used types
pub use action::{Action, ThunkAction};
pub use api::{Dispatch, GetState, MiddlewareApi, Next};
pub use composition::chain;
pub use extra::ExtraArgument;
pub use middleware::{Interceptor, Middleware, wrap};
pub use service::{ServiceThunkMiddleware, create_service_thunk};
pub use thunk::{ThunkInterceptor, ThunkMiddleware, create_thunk_middleware, thunk, with_extra_argument};
