//! Integration tests for the thunk middleware attached to a host store
//!
//! These tests wire the middleware into [`MockStore`] and validate:
//! - Thunks receive the store's own `dispatch` and `get_state` handles
//! - Plain actions reach the reducer untouched
//! - Re-entrant dispatch from inside a thunk goes through the whole chain
//! - Deferred outputs are handed back without being polled
//! - Service factories behave like a pre-resolved extra argument
//!
//! # Panics
//!
//! These tests use `unwrap()` and `panic!()` for setup failures, which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use composable_thunk_core::middleware::{from_fn, interceptor_fn};
use composable_thunk_core::{
    Action, Dispatch, ExtraArgument, GetState, Middleware, MiddlewareApi, StoreTypes,
    create_service_thunk, create_thunk_middleware, thunk, with_extra_argument,
};
use composable_thunk_testing::{MockStore, init_test_tracing};
use futures::FutureExt;
use futures::future::BoxFuture;
use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A todo list whose reducer echoes the added title
struct Todos;

impl StoreTypes for Todos {
    type State = Vec<String>;
    type Action = String;
    type Extra = ();
    type Output = String;
}

fn add_todo(state: &mut Vec<String>, title: String) -> String {
    state.push(title.clone());
    title
}

fn todo_store() -> MockStore<Todos> {
    MockStore::with_middleware(Vec::new(), add_todo, vec![Box::new(thunk::<Todos>())])
}

#[test]
fn test_thunk_receives_store_handles() {
    init_test_tracing();
    let store = todo_store();
    let api = store.api();

    let output = store.thunk(move |dispatch, get_state, _| {
        assert!(dispatch.same_as(&api.dispatch));
        assert!(get_state.same_as(&api.get_state));
        "X".to_string()
    });

    assert_eq!(output, "X");
    assert!(store.reduced_actions().is_empty());
}

#[test]
fn test_plain_action_reaches_reducer() {
    let store = todo_store();

    let output = store.plain("write tests".to_string());

    assert_eq!(output, "write tests");
    assert_eq!(store.state(), vec!["write tests".to_string()]);
}

#[test]
fn test_thunk_can_dispatch_and_read_state() {
    let store = todo_store();
    store.plain("first".to_string());

    let output = store.thunk(|dispatch, get_state, _| {
        let count = get_state.get().len();
        dispatch.plain(format!("second (after {count})"))
    });

    assert_eq!(output, "second (after 1)");
    assert_eq!(
        store.state(),
        vec!["first".to_string(), "second (after 1)".to_string()]
    );
}

#[test]
fn test_nested_thunks_are_unwrapped_by_full_dispatch() {
    let store = todo_store();

    let output = store.thunk(|dispatch, _, _| {
        let inner = dispatch.thunk(|dispatch, get_state, _| {
            dispatch.plain("inner".to_string());
            format!("inner saw {}", get_state.get().len())
        });
        dispatch.plain("outer".to_string());
        inner
    });

    assert_eq!(output, "inner saw 1");
    assert_eq!(
        store.reduced_actions(),
        vec!["inner".to_string(), "outer".to_string()]
    );
}

#[test]
fn test_middleware_before_thunk_sees_thunks() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    let logger = from_fn(move |_api: &MiddlewareApi<Todos>| {
        let log = Arc::clone(&log);
        interceptor_fn(move |next: &Dispatch<Todos>, action: Action<Todos>| {
            let label = action.as_plain().cloned().unwrap_or_else(|| "<thunk>".to_string());
            log.lock().unwrap().push(label);
            next.dispatch(action)
        })
    });

    let middlewares: Vec<Box<dyn Middleware<Todos>>> =
        vec![Box::new(logger), Box::new(thunk::<Todos>())];
    let store = MockStore::with_middleware(Vec::new(), add_todo, middlewares);

    store.thunk(|dispatch, _, _| dispatch.plain("from thunk".to_string()));

    // The thunk's own dispatch re-enters the chain from the top
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["<thunk>".to_string(), "from thunk".to_string()]
    );
}

/// Session store whose thunks get an API client as the extra argument
struct Session;

#[derive(Debug, Default)]
struct Client {
    token: String,
}

impl StoreTypes for Session {
    type State = u32;
    type Action = u32;
    type Extra = Client;
    type Output = u32;
}

fn set_user(state: &mut u32, user: u32) -> u32 {
    *state = user;
    user
}

#[test]
fn test_static_extra_argument_is_shared() {
    let store = MockStore::<Session>::with_middleware(
        0,
        set_user,
        vec![Box::new(with_extra_argument(ExtraArgument::<Session>::value(Client {
            token: "abc".to_string(),
        })))],
    );

    let first = store.thunk(|_, _, client| u32::try_from(client.token.len()).unwrap());
    let second = store.thunk(|_, _, client| u32::from(client.token == "abc"));

    assert_eq!(first, 3);
    assert_eq!(second, 1);
}

#[test]
fn test_absent_extra_argument_is_default() {
    let store = MockStore::<Session>::with_middleware(
        0,
        set_user,
        vec![Box::new(create_thunk_middleware::<Session>(None))],
    );

    let output = store.thunk(|_, _, client| u32::from(client.token.is_empty()));

    assert_eq!(output, 1);
}

/// Services built from the store's handles
struct Services {
    dispatch: Dispatch<Accounts>,
    get_state: GetState<Accounts>,
    built: usize,
}

struct Accounts;

impl StoreTypes for Accounts {
    type State = u64;
    type Action = u64;
    type Extra = Services;
    type Output = u64;
}

fn deposit(state: &mut u64, amount: u64) -> u64 {
    *state += amount;
    *state
}

fn counting_factory(
    builds: &Arc<AtomicUsize>,
) -> impl Fn(&Dispatch<Accounts>, &GetState<Accounts>) -> Services + Send + Sync + 'static {
    let builds = Arc::clone(builds);
    move |dispatch, get_state| Services {
        dispatch: dispatch.clone(),
        get_state: get_state.clone(),
        built: builds.fetch_add(1, Ordering::SeqCst) + 1,
    }
}

fn run_services_scenario(store: &MockStore<Accounts>) -> (u64, u64) {
    let via_services = store.thunk(|_, _, services| {
        services.dispatch.plain(10);
        services.get_state.get()
    });
    let via_handles = store.thunk(|dispatch, get_state, services| {
        dispatch.plain(5);
        get_state.get() * 100 + u64::try_from(services.built).unwrap()
    });
    (via_services, via_handles)
}

#[test]
fn test_service_thunk_matches_resolved_extra_argument() {
    let service_builds = Arc::new(AtomicUsize::new(0));
    let service_store = MockStore::<Accounts>::with_middleware(
        0,
        deposit,
        vec![Box::new(create_service_thunk::<Accounts, _>(counting_factory(&service_builds)))],
    );

    let factory_builds = Arc::new(AtomicUsize::new(0));
    let factory_store = MockStore::<Accounts>::with_middleware(
        0,
        deposit,
        vec![Box::new(with_extra_argument(ExtraArgument::<Accounts>::factory(
            counting_factory(&factory_builds),
        )))],
    );

    let from_service = run_services_scenario(&service_store);
    let from_factory = run_services_scenario(&factory_store);

    assert_eq!(from_service, (10, 1501));
    assert_eq!(from_service, from_factory);
    assert_eq!(service_store.state(), factory_store.state());

    // Built once at attachment, never per thunk
    assert_eq!(service_builds.load(Ordering::SeqCst), 1);
    assert_eq!(factory_builds.load(Ordering::SeqCst), 1);
}

#[test]
fn test_services_dispatch_reenters_the_chain() {
    let builds = Arc::new(AtomicUsize::new(0));
    let store = MockStore::<Accounts>::with_middleware(
        0,
        deposit,
        vec![Box::new(create_service_thunk::<Accounts, _>(counting_factory(&builds)))],
    );

    // A thunk dispatched through the services' handle is still run
    let output = store.thunk(|_, _, services| {
        services
            .dispatch
            .thunk(|dispatch, _, _| dispatch.plain(7))
    });

    assert_eq!(output, 7);
    assert_eq!(store.reduced_actions(), vec![7]);
}

#[test]
#[should_panic(expected = "Dispatching while constructing your middleware is not allowed")]
fn test_dispatch_during_service_construction_panics() {
    let _store = MockStore::<Accounts>::with_middleware(
        0,
        deposit,
        vec![Box::new(create_service_thunk::<Accounts, _>(|dispatch: &Dispatch<Accounts>, get_state: &GetState<Accounts>| {
            dispatch.plain(1);
            Services {
                dispatch: dispatch.clone(),
                get_state: get_state.clone(),
                built: 1,
            }
        }))],
    );
}

/// Store whose dispatch output is a future resolving to the new total
struct Deferred;

impl StoreTypes for Deferred {
    type State = u64;
    type Action = u64;
    type Extra = ();
    type Output = BoxFuture<'static, u64>;
}

fn deferred_store() -> MockStore<Deferred> {
    MockStore::with_middleware(
        0,
        |state: &mut u64, amount: u64| {
            *state += amount;
            let total = *state;
            async move { total }.boxed()
        },
        vec![Box::new(thunk::<Deferred>())],
    )
}

#[tokio::test]
async fn test_deferred_output_is_not_polled() {
    let store = deferred_store();
    let polled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&polled);

    let pending = store.thunk(move |dispatch, _, _| {
        let dispatch = dispatch.clone();
        async move {
            flag.store(true, Ordering::SeqCst);
            dispatch.plain(5).await
        }
        .boxed()
    });

    assert!(!polled.load(Ordering::SeqCst));
    assert_eq!(store.state(), 0);

    assert_eq!(pending.await, 5);
    assert!(polled.load(Ordering::SeqCst));
    assert_eq!(store.state(), 5);
}

#[test]
fn test_deferred_plain_output_passes_through() {
    let store = deferred_store();

    let pending = store.plain(3);

    // The reducer already ran; only the output is deferred
    assert_eq!(store.state(), 3);
    assert_eq!(tokio_test::block_on(pending), 3);
}

/// Counter used for the pass-through property
struct Counter;

impl StoreTypes for Counter {
    type State = i64;
    type Action = i64;
    type Extra = ();
    type Output = i64;
}

proptest! {
    #[test]
    fn prop_plain_actions_pass_through_unchanged(deltas in prop::collection::vec(-1000i64..1000, 0..32)) {
        let store = MockStore::<Counter>::with_middleware(
            0,
            |state: &mut i64, delta: i64| {
                *state += delta;
                delta
            },
            vec![Box::new(thunk::<Counter>())],
        );

        for delta in &deltas {
            prop_assert_eq!(store.plain(*delta), *delta);
        }

        prop_assert_eq!(store.reduced_actions(), deltas.clone());
        prop_assert_eq!(store.state(), deltas.iter().sum::<i64>());
    }

    #[test]
    fn prop_thunk_output_is_returned_verbatim(value in any::<i64>()) {
        let store = MockStore::<Counter>::with_middleware(
            0,
            |state: &mut i64, delta: i64| {
                *state += delta;
                *state
            },
            vec![Box::new(thunk::<Counter>())],
        );

        prop_assert_eq!(store.thunk(move |_, _, _| value), value);
        prop_assert!(store.reduced_actions().is_empty());
    }
}
