use async_trait::async_trait;

/// A binary asset ready for persistence
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Repository for the file storage collaborator.
///
/// The storage backend is external; this trait only covers the two calls
/// the generation flow needs: persisting one asset for an opaque reference,
/// and exchanging that reference for a fetchable URL later.
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// Persist one file, returning an opaque storage reference
    async fn upload(&self, file: StoredFile) -> Result<String, String>;

    /// Resolve a storage reference to a public URL
    ///
    /// # Errors
    /// Returns error for unknown or expired references
    async fn resolve_url(&self, storage_id: &str) -> Result<String, String>;
}
