//! Generator runtime for the steward daemon.
//!
//! Hosts long-running reconcilers ("generators") against a shared resource
//! store:
//!
//! - **Contract**: a [`GeneratorType`] names the generator, declares the
//!   kinds it manages and constructs instances
//! - **Composition**: each generator receives the root store wrapped in a
//!   kind allowlist and an ownership stamp
//! - **Supervision**: generators run as independent tasks sharing one
//!   cancellation token; a failing generator is logged, never restarted,
//!   and does not take its peers down
//! - **Shutdown**: signal handlers cancel the root token; `stop` waits for
//!   the tasks within a bounded deadline
//!
//! # Example
//!
//! ```ignore
//! use steward_runtime::{install_signal_handlers, Runtime};
//! use steward_state::MemoryStore;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> steward_runtime::Result<()> {
//!     let mut runtime = Runtime::new(MemoryStore::new_arc());
//!     runtime.register(&MyGeneratorType)?;
//!
//!     let root = CancellationToken::new();
//!     install_signal_handlers(root.clone());
//!     runtime.start(root).await
//! }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(clippy::panic)]

pub mod error;
pub mod generator;
pub mod runtime;
pub mod shutdown;

// Re-export main types
pub use error::{BoxError, Error, Result};
pub use generator::{Generator, GeneratorContext, GeneratorType};
pub use runtime::Runtime;
pub use shutdown::{install_signal_handlers, ShutdownSignal};
