//! # Services Demo
//!
//! A todo list whose thunks talk to an API client injected through the
//! thunk middleware's extra argument.
//!
//! This example showcases:
//! - Building per-store services with `create_service_thunk`
//! - Thunks that read state, dispatch, and return a future
//! - Deferred outputs passed back to the caller untouched
//!
//! ## Architecture
//!
//! Plain [`TodoAction`]s are reduced synchronously by [`reduce`]. Thunks built
//! by [`fetch_todos`], [`add_todo`] and [`toggle_todo`] run their synchronous
//! part at dispatch time and hand back a [`TodoOutput`] future; nothing talks
//! to the API until the caller awaits it.
//!
//! ## Example
//!
//! ```no_run
//! use services_demo::{ServicesConfig, TodoApi, add_todo, create_store, fetch_todos};
//!
//! # async fn example() -> Result<(), services_demo::ApiError> {
//! let api = TodoApi::new(&ServicesConfig::default());
//! let store = create_store(&api);
//!
//! store.dispatch(fetch_todos()).await?;
//! store.dispatch(add_todo("Ship it")).await?;
//! assert_eq!(store.state().todos.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;

pub use api::{ApiError, Todo, TodoApi};
pub use config::{ConfigError, ServicesConfig};

use composable_thunk_core::{Action, Dispatch, StoreTypes, create_service_thunk};
use composable_thunk_testing::MockStore;
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use serde::Serialize;

/// Todo list state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoState {
    /// Todos as last reported by the API
    pub todos: Vec<Todo>,
    /// Whether a fetch is in flight
    pub loading: bool,
    /// Message of the last failed fetch
    pub last_error: Option<String>,
}

/// Plain todo actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoAction {
    /// A fetch was started
    FetchStarted,
    /// A fetch returned the full list
    FetchSucceeded(Vec<Todo>),
    /// A fetch failed
    FetchFailed(String),
    /// The API created a todo
    Added(Todo),
    /// The API changed a todo
    Updated(Todo),
}

/// What every dispatch returns
///
/// Plain actions resolve immediately; thunks resolve once their API calls finish.
pub type TodoOutput = BoxFuture<'static, Result<(), ApiError>>;

/// Store types for the todo list
#[derive(Debug, Clone, Copy)]
pub struct TodoStore;

impl StoreTypes for TodoStore {
    type State = TodoState;
    type Action = TodoAction;
    type Extra = TodoServices;
    type Output = TodoOutput;
}

/// Todo reducer
pub fn reduce(state: &mut TodoState, action: TodoAction) -> TodoOutput {
    match action {
        TodoAction::FetchStarted => {
            state.loading = true;
        },
        TodoAction::FetchSucceeded(todos) => {
            state.todos = todos;
            state.loading = false;
            state.last_error = None;
        },
        TodoAction::FetchFailed(message) => {
            state.loading = false;
            state.last_error = Some(message);
        },
        TodoAction::Added(todo) => {
            state.todos.push(todo);
        },
        TodoAction::Updated(todo) => {
            if let Some(existing) = state.todos.iter_mut().find(|t| t.id == todo.id) {
                *existing = todo;
            }
        },
    }

    future::ready(Ok(())).boxed()
}

/// Services handed to every thunk
///
/// Built once per store by the service factory, so they can keep the store's
/// dispatch handle and report results on their own.
pub struct TodoServices {
    api: TodoApi,
    dispatch: Dispatch<TodoStore>,
}

impl TodoServices {
    /// Bind an API client to a store
    #[must_use]
    pub const fn new(api: TodoApi, dispatch: Dispatch<TodoStore>) -> Self {
        Self { api, dispatch }
    }

    /// The API client
    #[must_use]
    pub const fn api(&self) -> &TodoApi {
        &self.api
    }

    /// Fetch every todo and dispatch the outcome
    pub fn load(&self) -> TodoOutput {
        let api = self.api.clone();
        let dispatch = self.dispatch.clone();

        async move {
            match api.fetch_all().await {
                Ok(todos) => {
                    tracing::debug!(count = todos.len(), "Fetched todos");
                    dispatch.plain(TodoAction::FetchSucceeded(todos)).await
                },
                Err(error) => {
                    tracing::warn!(%error, "Fetching todos failed");
                    dispatch.plain(TodoAction::FetchFailed(error.to_string())).await?;
                    Err(error)
                },
            }
        }
        .boxed()
    }
}

impl std::fmt::Debug for TodoServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoServices")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

/// Create a todo store with the service thunk middleware applied
#[must_use]
pub fn create_store(api: &TodoApi) -> MockStore<TodoStore> {
    let api = api.clone();
    let services = create_service_thunk::<TodoStore, _>(move |dispatch, _get_state| {
        tracing::debug!("Wiring todo services");
        TodoServices::new(api.clone(), dispatch.clone())
    });

    MockStore::with_middleware(TodoState::default(), reduce, vec![Box::new(services)])
}

/// Mark the list as loading, then fetch it
#[must_use]
pub fn fetch_todos() -> Action<TodoStore> {
    Action::<TodoStore>::thunk(|dispatch, _get_state, services: &TodoServices| {
        let started = dispatch.plain(TodoAction::FetchStarted);
        let load = services.load();

        async move {
            started.await?;
            load.await
        }
        .boxed()
    })
}

/// Create a todo and add it to the list
#[must_use]
pub fn add_todo(title: impl Into<String>) -> Action<TodoStore> {
    let title = title.into();

    Action::<TodoStore>::thunk(move |dispatch, _get_state, services: &TodoServices| {
        let api = services.api().clone();
        let dispatch = dispatch.clone();

        async move {
            let todo = api.create(title).await?;
            dispatch.plain(TodoAction::Added(todo)).await
        }
        .boxed()
    })
}

/// Toggle a todo the store knows about
///
/// Ids missing from the current state fail without calling the API.
#[must_use]
pub fn toggle_todo(id: u64) -> Action<TodoStore> {
    Action::<TodoStore>::thunk(move |dispatch, get_state, services: &TodoServices| {
        if !get_state.get().todos.iter().any(|todo| todo.id == id) {
            tracing::debug!(id, "Toggle skipped: unknown todo");
            return future::ready(Err(ApiError::NotFound(id))).boxed();
        }

        let api = services.api().clone();
        let dispatch = dispatch.clone();

        async move {
            let todo = api.toggle(id).await?;
            dispatch.plain(TodoAction::Updated(todo)).await
        }
        .boxed()
    })
}
