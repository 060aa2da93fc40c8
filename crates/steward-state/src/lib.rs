//! Typed, watchable, in-memory resource store.
//!
//! This crate is the state backbone of the steward runtime:
//!
//! - **Resource model**: metadata plus a closed set of typed spec variants
//! - **Store**: thread-safe CRUD with generation stamping, finalizer-gated
//!   deletion and an owner check
//! - **Watch**: per-kind change streams delivered in commit order
//! - **Wrappers**: composable decorators for kind allowlisting and
//!   single-owner mutation
//! - **Typed view**: a kind-parameterized facade yielding typed records
//!
//! # Example
//!
//! ```ignore
//! use steward_state::{MemoryStore, NetworkInterfaceSpec, Store, TypedStore};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::new_arc();
//!     let ifaces = TypedStore::<NetworkInterfaceSpec>::new(store);
//!
//!     let mut watch = ifaces.watch(CancellationToken::new()).await.unwrap();
//!
//!     let spec = NetworkInterfaceSpec {
//!         interface_name: "eth0".to_string(),
//!         mac_address: "00:11:22:33:44:55".to_string(),
//!         ip_addresses: vec![],
//!     };
//!     ifaces.create("eth0", spec).await.unwrap();
//!
//!     let record = watch.recv().await.unwrap();
//!     println!("observed {}", record.spec.interface_name);
//! }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(clippy::panic)]

pub mod error;
pub mod event;
pub mod ownership;
pub mod resource;
pub mod restricted;
pub mod store;
pub mod typed;

// Re-export main types
pub use error::{Error, Result};
pub use event::{Event, EventStream, EventType};
pub use ownership::OwnershipStore;
pub use resource::{
    kind_of, DhcpClientSpec, Metadata, NetworkInterfaceSpec, Record, Resource, ResourceSpec,
};
pub use restricted::TypeRestrictedStore;
pub use store::{MemoryStore, MemoryStoreConfig, Store};
pub use typed::{TypedRecord, TypedStore, TypedStream};
