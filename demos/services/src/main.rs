//! Services demo binary
//!
//! Wires an in-memory todo API into thunks through a service factory.

use services_demo::{ServicesConfig, TodoApi, add_todo, create_store, fetch_todos, toggle_todo};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "services_demo=debug,composable_thunk_core=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Services Demo: Thunks with injected services ===\n");

    let config = ServicesConfig::from_env()?;
    println!("API latency: {:?}", config.latency);

    let api = TodoApi::new(&config);
    let store = create_store(&api);

    println!("\n>>> Dispatching: fetch_todos()");
    let pending = store.dispatch(fetch_todos());
    println!("Loading flag right after dispatch: {}", store.state().loading);
    pending.await?;
    println!("Todos after fetch: {}", store.state().todos.len());

    println!("\n>>> Dispatching: add_todo(\"Ship the demo\")");
    store.dispatch(add_todo("Ship the demo")).await?;

    println!("\n>>> Dispatching: toggle_todo(1)");
    store.dispatch(toggle_todo(1)).await?;

    println!("\n>>> Dispatching: toggle_todo(99)");
    if let Err(error) = store.dispatch(toggle_todo(99)).await {
        println!("Rejected before reaching the API: {error}");
    }

    println!("\n>>> Dispatching: add_todo(\"   \")");
    if let Err(error) = store.dispatch(add_todo("   ")).await {
        println!("Rejected by the API: {error}");
    }

    println!("\nFinal state:");
    println!("{}", serde_json::to_string_pretty(&store.state())?);
    println!("\nAPI requests made: {}", api.calls());

    Ok(())
}
