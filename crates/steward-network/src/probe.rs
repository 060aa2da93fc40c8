//! Host link enumeration.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// A network link as observed on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    /// Link name, e.g. `eth0`.
    pub name: String,
    /// Hardware (MAC) address; empty when the link has none.
    pub hardware_address: String,
    /// Layer-3 addresses in CIDR notation.
    pub addresses: Vec<String>,
}

/// Errors from probing host links.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to enumerate links: {0}")]
    Io(#[from] io::Error),
}

/// Enumerates the network links present on the host.
///
/// A link missing from a probe that was present before is interpreted by
/// the generator as removed.
#[async_trait]
pub trait LinkProber: Send + Sync {
    async fn probe(&self) -> Result<Vec<LinkInfo>, ProbeError>;
}

/// Prober backed by `/sys/class/net`.
///
/// Yields link names and hardware addresses. The sysfs surface does not
/// expose layer-3 addresses, so `addresses` stays empty.
pub struct SysfsLinkProber {
    root: PathBuf,
}

impl SysfsLinkProber {
    /// Probe the canonical `/sys/class/net` tree.
    pub fn new() -> Self {
        Self::with_root("/sys/class/net")
    }

    /// Probe an alternate sysfs root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for SysfsLinkProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkProber for SysfsLinkProber {
    async fn probe(&self) -> Result<Vec<LinkInfo>, ProbeError> {
        let root = self.root.clone();
        match tokio::task::spawn_blocking(move || read_links(&root)).await {
            Ok(links) => Ok(links?),
            Err(e) => Err(ProbeError::Io(io::Error::other(e))),
        }
    }
}

fn read_links(root: &Path) -> io::Result<Vec<LinkInfo>> {
    let mut links = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();

        // Virtual links may have no address attribute.
        let hardware_address = std::fs::read_to_string(entry.path().join("address"))
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        links.push(LinkInfo {
            name,
            hardware_address,
            addresses: Vec::new(),
        });
    }
    Ok(links)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let prober = SysfsLinkProber::with_root("/definitely/not/a/sysfs");
        let err = prober.probe().await.unwrap_err();
        assert!(matches!(err, ProbeError::Io(_)));
    }
}
