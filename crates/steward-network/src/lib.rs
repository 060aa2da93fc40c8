//! Network interface generator.
//!
//! Reconciles `NetworkInterface` resources against the links present on
//! the host:
//!
//! - **Prober**: the narrow interface through which link state enters the
//!   system, with a `/sys/class/net` implementation
//! - **Generator**: a fixed-period reconcile loop creating, updating and
//!   deleting interface resources to track the probe

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(clippy::panic)]

pub mod generator;
pub mod probe;

// Re-export main types
pub use generator::{InterfaceGenerator, InterfaceGeneratorConfig, InterfaceGeneratorType};
pub use probe::{LinkInfo, LinkProber, ProbeError, SysfsLinkProber};
