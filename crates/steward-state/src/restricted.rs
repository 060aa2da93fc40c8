//! Store decorator that limits operations to an allowlist of kinds.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::event::EventStream;
use crate::resource::Resource;
use crate::store::Store;

/// Wraps a [`Store`] so only the listed kinds are reachable.
///
/// Operations targeting any other kind fail with
/// [`Error::TypeRestricted`] carrying the kind and the attempted action.
pub struct TypeRestrictedStore {
    inner: Arc<dyn Store>,
    allowed: HashSet<String>,
}

impl TypeRestrictedStore {
    /// Create a new wrapper allowing access to `kinds` only.
    pub fn new<I, K>(inner: Arc<dyn Store>, kinds: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            inner,
            allowed: kinds.into_iter().map(Into::into).collect(),
        }
    }

    fn check(&self, kind: &str, action: &str) -> Result<()> {
        if self.allowed.contains(kind) {
            Ok(())
        } else {
            Err(Error::type_restricted(kind, action))
        }
    }
}

#[async_trait]
impl Store for TypeRestrictedStore {
    async fn get(&self, kind: &str, name: &str) -> Result<Resource> {
        self.check(kind, "get")?;
        self.inner.get(kind, name).await
    }

    async fn list(&self, kind: &str) -> Result<Vec<Resource>> {
        self.check(kind, "list")?;
        self.inner.list(kind).await
    }

    async fn create(&self, resource: &mut Resource) -> Result<()> {
        self.check(resource.kind(), "create")?;
        self.inner.create(resource).await
    }

    async fn update(&self, resource: &mut Resource) -> Result<()> {
        self.check(resource.kind(), "update")?;
        self.inner.update(resource).await
    }

    async fn delete(&self, kind: &str, name: &str) -> Result<()> {
        self.check(kind, "delete")?;
        self.inner.delete(kind, name).await
    }

    async fn watch(&self, kind: &str, cancel: CancellationToken) -> Result<EventStream> {
        self.check(kind, "watch")?;
        self.inner.watch(kind, cancel).await
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resource::{DhcpClientSpec, NetworkInterfaceSpec};
    use crate::store::MemoryStore;

    fn test_interface(name: &str) -> Resource {
        Resource::from_record(
            name,
            NetworkInterfaceSpec {
                interface_name: name.to_string(),
                ..NetworkInterfaceSpec::default()
            },
        )
    }

    fn setup() -> (Arc<MemoryStore>, TypeRestrictedStore) {
        let store = MemoryStore::new_arc();
        let restricted = TypeRestrictedStore::new(store.clone(), ["NetworkInterface"]);
        (store, restricted)
    }

    #[tokio::test]
    async fn test_allowed_kind_passes_through() -> Result<()> {
        let (_, restricted) = setup();
        let mut iface = test_interface("eth0");

        restricted.create(&mut iface).await?;
        restricted.get("NetworkInterface", "eth0").await?;

        let resources = restricted.list("NetworkInterface").await?;
        assert_eq!(resources.len(), 1);

        restricted.update(&mut iface.clone()).await?;

        let cancel = CancellationToken::new();
        let _events = restricted.watch("NetworkInterface", cancel).await?;

        restricted.delete("NetworkInterface", "eth0").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_disallowed_kind_is_rejected_per_action() -> Result<()> {
        let (store, restricted) = setup();

        let mut client = Resource::from_record(
            "client1",
            DhcpClientSpec {
                interface_ref: "eth0".to_string(),
                enabled: true,
            },
        );

        let err = restricted.create(&mut client.clone()).await.unwrap_err();
        assert_eq!(err, Error::type_restricted("DHCPClient", "create"));

        // Create directly in the core store to probe the other operations.
        store.create(&mut client).await?;

        let err = restricted.get("DHCPClient", "client1").await.unwrap_err();
        assert_eq!(err, Error::type_restricted("DHCPClient", "get"));

        let err = restricted.list("DHCPClient").await.unwrap_err();
        assert_eq!(err, Error::type_restricted("DHCPClient", "list"));

        let err = restricted.update(&mut client.clone()).await.unwrap_err();
        assert_eq!(err, Error::type_restricted("DHCPClient", "update"));

        let cancel = CancellationToken::new();
        let err = restricted.watch("DHCPClient", cancel).await.unwrap_err();
        assert_eq!(err, Error::type_restricted("DHCPClient", "watch"));

        let err = restricted.delete("DHCPClient", "client1").await.unwrap_err();
        assert_eq!(err, Error::type_restricted("DHCPClient", "delete"));
        Ok(())
    }
}
