//! Generator lifecycle supervision.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use steward_state::{OwnershipStore, Store, TypeRestrictedStore};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info, info_span, warn, Instrument};

use crate::error::{Error, Result};
use crate::generator::{Generator, GeneratorContext, GeneratorType};

/// Supervises registered generators against a shared store.
pub struct Runtime {
    store: Arc<dyn Store>,
    generators: HashMap<String, Arc<dyn Generator>>,
    tracker: TaskTracker,
}

impl Runtime {
    /// Create a new runtime around the root store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            generators: HashMap::new(),
            tracker: TaskTracker::new(),
        }
    }

    /// The unrestricted root store.
    pub fn store(&self) -> Arc<dyn Store> {
        Arc::clone(&self.store)
    }

    /// Register a generator type.
    ///
    /// The generator is constructed against the root store wrapped first in
    /// a kind allowlist and then in an ownership stamp, so a disallowed
    /// kind is rejected before any ownership check runs.
    pub fn register(&mut self, gen_type: &dyn GeneratorType) -> Result<()> {
        let name = gen_type.name().to_string();
        if self.generators.contains_key(&name) {
            error!(name = %name, "Generator already registered");
            return Err(Error::already_registered(name));
        }

        let kinds = gen_type.managed_kinds();
        let restricted: Arc<dyn Store> = Arc::new(TypeRestrictedStore::new(
            Arc::clone(&self.store),
            kinds.clone(),
        ));
        let restricted: Arc<dyn Store> = Arc::new(OwnershipStore::new(restricted, name.clone()));

        let generator = gen_type
            .create(GeneratorContext { store: restricted })
            .map_err(|source| Error::construction(name.clone(), source))?;

        info!(name = %name, managed_kinds = ?kinds, "Registered generator");
        self.generators.insert(name, generator);
        Ok(())
    }

    /// Run every registered generator and block until all of them stop.
    ///
    /// The tasks share `cancel`; a generator returning an error is logged
    /// and does not cancel its peers.
    pub async fn start(&self, cancel: CancellationToken) -> Result<()> {
        info!(generators = self.generators.len(), "Starting runtime");

        for (name, generator) in &self.generators {
            let generator = Arc::clone(generator);
            let cancel = cancel.clone();
            let task_name = name.clone();
            let span = info_span!("generator", name = %name);

            self.tracker.spawn(
                async move {
                    if let Err(e) = generator.run(cancel).await {
                        error!(name = %task_name, error = %e, "Generator failed");
                    }
                }
                .instrument(span),
            );
        }

        self.tracker.close();
        self.tracker.wait().await;
        Ok(())
    }

    /// Wait for in-flight generator tasks to finish, up to `deadline`.
    ///
    /// On timeout the remaining tasks are left running; cancelling the root
    /// token is the caller's responsibility.
    pub async fn stop(&self, deadline: Duration) -> Result<()> {
        info!("Stopping runtime");

        self.tracker.close();
        match timeout(deadline, self.tracker.wait()).await {
            Ok(()) => {
                info!("Runtime stopped gracefully");
                Ok(())
            }
            Err(_) => {
                warn!(secs = deadline.as_secs(), "Runtime stop timed out");
                Err(Error::shutdown_timeout(deadline))
            }
        }
    }
}
