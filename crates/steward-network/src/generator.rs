//! Generator reconciling interface resources against probed links.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use steward_runtime::{Generator, GeneratorContext, GeneratorType, Result as RuntimeResult};
use steward_state::{kind_of, NetworkInterfaceSpec, Result as StateResult, TypedStore};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::probe::{LinkInfo, LinkProber};

/// Configuration for the interface generator.
#[derive(Debug, Clone)]
pub struct InterfaceGeneratorConfig {
    /// How often to re-probe host links.
    pub poll_interval: Duration,
}

impl Default for InterfaceGeneratorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
        }
    }
}

impl InterfaceGeneratorConfig {
    /// Set the probe interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Generator type for host network interfaces.
pub struct InterfaceGeneratorType {
    prober: Arc<dyn LinkProber>,
    config: InterfaceGeneratorConfig,
}

impl InterfaceGeneratorType {
    /// Create the type with default configuration.
    pub fn new(prober: Arc<dyn LinkProber>) -> Self {
        Self::with_config(prober, InterfaceGeneratorConfig::default())
    }

    /// Create the type with the given configuration.
    pub fn with_config(prober: Arc<dyn LinkProber>, config: InterfaceGeneratorConfig) -> Self {
        Self { prober, config }
    }
}

impl GeneratorType for InterfaceGeneratorType {
    fn name(&self) -> &str {
        "network-interfaces"
    }

    fn managed_kinds(&self) -> Vec<String> {
        vec![kind_of::<NetworkInterfaceSpec>().to_string()]
    }

    fn create(&self, ctx: GeneratorContext) -> RuntimeResult<Arc<dyn Generator>> {
        Ok(Arc::new(InterfaceGenerator {
            store: TypedStore::new(ctx.store),
            prober: Arc::clone(&self.prober),
            poll_interval: self.config.poll_interval,
        }))
    }
}

/// Watches host links and maintains matching `NetworkInterface` resources.
pub struct InterfaceGenerator {
    store: TypedStore<NetworkInterfaceSpec>,
    prober: Arc<dyn LinkProber>,
    poll_interval: Duration,
}

#[async_trait]
impl Generator for InterfaceGenerator {
    async fn run(&self, cancel: CancellationToken) -> RuntimeResult<()> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = cancel.cancelled() => return Ok(()),
                _ = ticker.tick() => {
                    if let Err(e) = self.reconcile().await {
                        error!(error = %e, "Failed to reconcile interfaces");
                    }
                }
            }
        }
    }
}

impl InterfaceGenerator {
    /// Drive stored interface resources toward the probed link set.
    ///
    /// Per-resource failures are logged and do not abort the tick; the next
    /// tick converges again.
    async fn reconcile(&self) -> StateResult<()> {
        let links = match self.prober.probe().await {
            Ok(links) => links,
            Err(e) => {
                warn!(error = %e, "Link probe failed, skipping tick");
                return Ok(());
            }
        };

        let stored = self.store.list().await?;
        let mut vanished: HashSet<String> = stored
            .iter()
            .map(|record| record.spec.interface_name.clone())
            .collect();

        for link in links {
            let LinkInfo {
                name,
                hardware_address,
                addresses,
            } = link;
            let spec = NetworkInterfaceSpec {
                interface_name: name.clone(),
                mac_address: hardware_address,
                ip_addresses: addresses,
            };

            match self.store.get(&name).await {
                Ok(_) => {
                    if let Err(e) = self.store.update(&name, spec).await {
                        error!(name = %name, error = %e, "Failed to update interface");
                    }
                }
                Err(_) => {
                    if let Err(e) = self.store.create(&name, spec).await {
                        error!(name = %name, error = %e, "Failed to create interface");
                    }
                }
            }
            vanished.remove(&name);
        }

        for name in vanished {
            if let Err(e) = self.store.delete(&name).await {
                error!(name = %name, error = %e, "Failed to delete interface");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use steward_state::MemoryStore;

    use super::*;
    use crate::probe::ProbeError;

    /// Prober returning a configurable link set.
    struct MockProber {
        links: Mutex<Vec<LinkInfo>>,
        fail: Mutex<bool>,
    }

    impl MockProber {
        fn new(links: Vec<LinkInfo>) -> Self {
            Self {
                links: Mutex::new(links),
                fail: Mutex::new(false),
            }
        }

        fn set_links(&self, links: Vec<LinkInfo>) {
            *self.links.lock().unwrap() = links;
        }

        fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl LinkProber for MockProber {
        async fn probe(&self) -> Result<Vec<LinkInfo>, ProbeError> {
            if *self.fail.lock().unwrap() {
                return Err(ProbeError::Io(std::io::Error::other("probe down")));
            }
            Ok(self.links.lock().unwrap().clone())
        }
    }

    fn link(name: &str, mac: &str) -> LinkInfo {
        LinkInfo {
            name: name.to_string(),
            hardware_address: mac.to_string(),
            addresses: vec![],
        }
    }

    fn generator(prober: Arc<MockProber>) -> InterfaceGenerator {
        InterfaceGenerator {
            store: TypedStore::new(MemoryStore::new_arc()),
            prober,
            poll_interval: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_reconcile_creates_probed_links() {
        let prober = Arc::new(MockProber::new(vec![
            link("eth0", "00:11:22:33:44:55"),
            link("lo", ""),
        ]));
        let generator = generator(prober);

        generator.reconcile().await.unwrap();

        let records = generator.store.list().await.unwrap();
        assert_eq!(records.len(), 2);

        let eth0 = generator.store.get("eth0").await.unwrap();
        assert_eq!(eth0.spec.mac_address, "00:11:22:33:44:55");
    }

    #[tokio::test]
    async fn test_reconcile_updates_changed_links() {
        let prober = Arc::new(MockProber::new(vec![link("eth0", "00:11:22:33:44:55")]));
        let generator = generator(Arc::clone(&prober));

        generator.reconcile().await.unwrap();

        prober.set_links(vec![link("eth0", "aa:bb:cc:dd:ee:ff")]);
        generator.reconcile().await.unwrap();

        let eth0 = generator.store.get("eth0").await.unwrap();
        assert_eq!(eth0.spec.mac_address, "aa:bb:cc:dd:ee:ff");
    }

    #[tokio::test]
    async fn test_reconcile_deletes_vanished_links() {
        let prober = Arc::new(MockProber::new(vec![
            link("eth0", "00:11:22:33:44:55"),
            link("eth1", "00:11:22:33:44:66"),
        ]));
        let generator = generator(Arc::clone(&prober));

        generator.reconcile().await.unwrap();
        assert_eq!(generator.store.list().await.unwrap().len(), 2);

        prober.set_links(vec![link("eth0", "00:11:22:33:44:55")]);
        generator.reconcile().await.unwrap();

        let records = generator.store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].spec.interface_name, "eth0");
    }

    #[tokio::test]
    async fn test_probe_failure_skips_tick() {
        let prober = Arc::new(MockProber::new(vec![link("eth0", "00:11:22:33:44:55")]));
        let generator = generator(Arc::clone(&prober));

        generator.reconcile().await.unwrap();

        // A failed probe must not be read as "all links vanished".
        prober.set_fail(true);
        generator.reconcile().await.unwrap();

        let records = generator.store.list().await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_generator_type_registration() {
        let prober = Arc::new(MockProber::new(vec![]));
        let gen_type = InterfaceGeneratorType::with_config(
            prober,
            InterfaceGeneratorConfig::default().with_poll_interval(Duration::from_millis(50)),
        );
        assert_eq!(gen_type.name(), "network-interfaces");
        assert_eq!(gen_type.managed_kinds(), vec!["NetworkInterface".to_string()]);

        let mut runtime = steward_runtime::Runtime::new(MemoryStore::new_arc());
        runtime.register(&gen_type).unwrap();
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let prober = Arc::new(MockProber::new(vec![]));
        let generator = Arc::new(generator(prober));

        let cancel = CancellationToken::new();
        let handle = tokio::spawn({
            let generator = Arc::clone(&generator);
            let cancel = cancel.clone();
            async move { generator.run(cancel).await }
        });

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
