//! steward daemon entry point.
//!
//! Wires the in-memory resource store, the generator runtime and the
//! network interface generator together, then runs until a termination
//! signal arrives.

use std::sync::Arc;
use std::time::Duration;

use steward_network::{InterfaceGeneratorType, SysfsLinkProber};
use steward_runtime::{install_signal_handlers, Runtime};
use steward_state::MemoryStore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Grace period for generators to wind down after the root token fires.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = MemoryStore::new_arc();
    let mut runtime = Runtime::new(store);

    let prober = Arc::new(SysfsLinkProber::new());
    runtime.register(&InterfaceGeneratorType::new(prober))?;

    let root = CancellationToken::new();
    let _signals = install_signal_handlers(root.clone());

    info!("Runtime started");

    let runtime = Arc::new(runtime);
    let running = tokio::spawn({
        let runtime = Arc::clone(&runtime);
        let root = root.clone();
        async move { runtime.start(root).await }
    });

    root.cancelled().await;
    info!("Shutting down");

    if let Err(e) = runtime.stop(SHUTDOWN_TIMEOUT).await {
        error!(error = %e, "Error during shutdown");
    }
    running.abort();

    Ok(())
}
