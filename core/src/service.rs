//! Thunk middleware built from a mandatory service factory.
//!
//! The factory builds the collaborators thunks need (API clients, caches) from
//! the store's own handles. It runs once per attachment, and the result is
//! bound as the static extra argument of an ordinary [`ThunkMiddleware`].

use crate::StoreTypes;
use crate::api::{Dispatch, GetState, MiddlewareApi};
use crate::extra::{ExtraArgument, ExtraFactory};
use crate::middleware::{Interceptor, Middleware};
use crate::thunk::ThunkMiddleware;
use std::sync::Arc;

/// Thunk middleware whose extra argument is always built by a factory
///
/// # Example
///
/// ```
/// use composable_thunk_core::{Action, Dispatch, GetState, Interceptor, Middleware, MiddlewareApi, StoreTypes, create_service_thunk};
///
/// struct Profile;
///
/// struct Services {
///     user_id: u64,
/// }
///
/// impl StoreTypes for Profile {
///     type State = u64;
///     type Action = ();
///     type Extra = Services;
///     type Output = u64;
/// }
///
/// let middleware = create_service_thunk(|_dispatch, get_state: &GetState<Profile>| Services {
///     user_id: get_state.get(),
/// });
///
/// let api = MiddlewareApi::<Profile>::new(Dispatch::new(|_| 0), GetState::new(|| 7));
/// let interceptor = middleware.attach(&api);
/// let next = Dispatch::new(|_action: Action<Profile>| 0);
///
/// let output = interceptor.handle(&next, Action::<Profile>::thunk(|_, _, services: &Services| services.user_id));
/// assert_eq!(output, 7);
/// ```
pub struct ServiceThunkMiddleware<T: StoreTypes> {
    factory: Arc<ExtraFactory<T>>,
}

impl<T: StoreTypes> ServiceThunkMiddleware<T> {
    /// Create the middleware from a service factory
    #[must_use]
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&Dispatch<T>, &GetState<T>) -> T::Extra + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Build the services for one store and bind them to a thunk middleware
    ///
    /// The factory is invoked exactly once per call.
    #[must_use]
    pub fn resolve(&self, api: &MiddlewareApi<T>) -> ThunkMiddleware<T> {
        tracing::debug!("Building thunk services");
        let services = (self.factory)(&api.dispatch, &api.get_state);
        ThunkMiddleware::with_extra_argument(ExtraArgument::value(services))
    }
}

impl<T: StoreTypes> Clone for ServiceThunkMiddleware<T> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<T: StoreTypes> std::fmt::Debug for ServiceThunkMiddleware<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ServiceThunkMiddleware(<factory>)")
    }
}

impl<T: StoreTypes> Middleware<T> for ServiceThunkMiddleware<T> {
    fn attach(&self, api: &MiddlewareApi<T>) -> Box<dyn Interceptor<T>> {
        self.resolve(api).attach(api)
    }
}

/// Create a thunk middleware from a service factory
#[must_use]
pub fn create_service_thunk<T, F>(factory: F) -> ServiceThunkMiddleware<T>
where
    T: StoreTypes,
    F: Fn(&Dispatch<T>, &GetState<T>) -> T::Extra + Send + Sync + 'static,
{
    ServiceThunkMiddleware::new(factory)
}
