//! Abstract artifact store contract

use relief_core::Result;

/// A key/value byte-blob store holding generated artifacts.
///
/// "Not found" is a normal outcome (`Ok(false)` / `Ok(None)`), distinct
/// from a transport error. Implementations must be safe to share across
/// the dispatch path and worker threads.
pub trait ArtifactStore: Send + Sync {
    /// Check whether an artifact exists under `key`
    fn exists(&self, key: &str) -> Result<bool>;

    /// Fetch the artifact under `key`, or `None` if absent
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous value
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;
}
