//! End-to-end test of the interface generator running under the runtime.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use steward_network::{
    InterfaceGeneratorConfig, InterfaceGeneratorType, LinkInfo, LinkProber, ProbeError,
};
use steward_runtime::Runtime;
use steward_state::{MemoryStore, Store};
use tokio_util::sync::CancellationToken;

struct ScriptedProber {
    links: Mutex<Vec<LinkInfo>>,
}

#[async_trait]
impl LinkProber for ScriptedProber {
    async fn probe(&self) -> Result<Vec<LinkInfo>, ProbeError> {
        Ok(self.links.lock().unwrap().clone())
    }
}

#[tokio::test]
async fn interface_generator_converges_under_runtime() {
    let prober = Arc::new(ScriptedProber {
        links: Mutex::new(vec![LinkInfo {
            name: "eth0".to_string(),
            hardware_address: "00:11:22:33:44:55".to_string(),
            addresses: vec![],
        }]),
    });

    let store = MemoryStore::new_arc();
    let mut runtime = Runtime::new(store.clone());
    runtime
        .register(&InterfaceGeneratorType::with_config(
            Arc::clone(&prober) as Arc<dyn LinkProber>,
            InterfaceGeneratorConfig::default().with_poll_interval(Duration::from_millis(20)),
        ))
        .unwrap();
    let runtime = Arc::new(runtime);

    let cancel = CancellationToken::new();
    let running = tokio::spawn({
        let runtime = Arc::clone(&runtime);
        let cancel = cancel.clone();
        async move { runtime.start(cancel).await }
    });

    // The generator publishes the probed link, owned by its own name.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if let Ok(resource) = store.get("NetworkInterface", "eth0").await {
            assert_eq!(resource.metadata.owner, "network-interfaces");
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "interface was never created"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Removing the link removes the resource on a later tick.
    prober.links.lock().unwrap().clear();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if store.get("NetworkInterface", "eth0").await.is_err() {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "interface was never deleted"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(1), running)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    runtime.stop(Duration::from_secs(1)).await.unwrap();
}
