//! # Composable Thunk Testing
//!
//! Testing utilities and helpers for Composable Thunk middleware.
//!
//! This crate provides:
//! - [`MockStore`]: A host store wiring middleware the way `applyMiddleware` does
//! - [`RecordingNext`]: A chain continuation that records what reaches it
//! - [`StubApi`]: `dispatch` / `get_state` handles that count their calls
//! - [`InterceptorTest`]: Given-When-Then assertions for a single middleware
//!
//! ## Example
//!
//! ```
//! use composable_thunk_core::{StoreTypes, thunk};
//! use composable_thunk_testing::MockStore;
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
//! let store = MockStore::<Counter>::with_middleware(
//!     0,
//!     |state: &mut i64, delta: i64| {
//!         *state += delta;
//!         *state
//!     },
//!     vec![Box::new(thunk::<Counter>())],
//! );
//!
//! store.plain(2);
//! let doubled = store.thunk(|dispatch, get_state, _| dispatch.plain(get_state.get()));
//! assert_eq!(doubled, 4);
//! assert_eq!(store.reduced_actions(), vec![2, 2]);
//! ```

/// Mock implementations of the host-side handles
pub mod mocks;

/// In-memory host store
pub mod mock_store;


// Re-export commonly used items
pub use interceptor_test::InterceptorTest;
pub use mock_store::MockStore;
pub use mocks::{Received, RecordingNext, StubApi, stub_api};

/// Install a `tracing` subscriber for tests
///
/// Reads `RUST_LOG`, defaulting to `composable_thunk_core=trace`. Safe to call
/// from every test; only the first call installs the subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "composable_thunk_core=trace".into()),
        )
        .with_test_writer()
        .try_init();
}
