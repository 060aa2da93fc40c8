//! The generator contract.

use std::sync::Arc;

use async_trait::async_trait;
use steward_state::Store;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Runtime-provided dependencies for a generator instance.
pub struct GeneratorContext {
    /// Store restricted to the generator's managed kinds, stamping the
    /// generator's name as owner on every write.
    pub store: Arc<dyn Store>,
}

/// A named family of generators and how to construct one.
pub trait GeneratorType: Send + Sync {
    /// Unique name; doubles as the owner recorded on managed resources.
    fn name(&self) -> &str;

    /// Resource kinds this generator may read and write.
    fn managed_kinds(&self) -> Vec<String>;

    /// Construct an instance with runtime-provided dependencies.
    fn create(&self, ctx: GeneratorContext) -> Result<Arc<dyn Generator>>;
}

/// A long-running component that reconciles resources.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run until `cancel` fires.
    async fn run(&self, cancel: CancellationToken) -> Result<()>;
}
