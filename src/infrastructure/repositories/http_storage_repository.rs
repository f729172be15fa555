use super::storage_repository::{StorageRepository, StoredFile};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// HTTP storage client configuration
#[derive(Debug, Clone)]
pub struct HttpStorageConfig {
    /// Storage service base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "storageId")]
    storage_id: String,
}

#[derive(Debug, Deserialize)]
struct ResolveUrlResponse {
    url: String,
}

/// HTTP implementation of the storage repository.
/// Talks JSON to the storage service; uploads carry the raw bytes with the
/// asset's own content type.
pub struct HttpStorageRepository {
    client: Client,
    config: HttpStorageConfig,
}

impl HttpStorageRepository {
    pub fn new(config: HttpStorageConfig) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build storage HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    fn upload_url(&self) -> String {
        format!("{}/v1/files", self.config.base_url)
    }

    fn resolve_url_endpoint(&self, storage_id: &str) -> String {
        format!("{}/v1/files/{}/url", self.config.base_url, storage_id)
    }

    fn request_error(e: reqwest::Error) -> String {
        if e.is_timeout() {
            "storage service timed out".to_string()
        } else if e.is_connect() {
            format!("cannot connect to storage service: {}", e)
        } else {
            e.to_string()
        }
    }
}

#[async_trait]
impl StorageRepository for HttpStorageRepository {
    async fn upload(&self, file: StoredFile) -> Result<String, String> {
        tracing::info!(
            url = %self.upload_url(),
            file_name = %file.name,
            mime_type = %file.mime_type,
            size_bytes = file.bytes.len(),
            "Uploading file to storage service"
        );

        let response = self
            .client
            .post(self.upload_url())
            .header(reqwest::header::CONTENT_TYPE, &file.mime_type)
            .header("X-File-Name", &file.name)
            .body(file.bytes)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, file_name = %file.name, "Storage upload failed");
                Self::request_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %error_text,
                "Storage service rejected upload"
            );
            return Err(format!("storage service returned HTTP {}", status));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid upload response: {}", e))?;

        tracing::debug!(storage_id = %upload.storage_id, "File stored");

        Ok(upload.storage_id)
    }

    async fn resolve_url(&self, storage_id: &str) -> Result<String, String> {
        let response = self
            .client
            .get(self.resolve_url_endpoint(storage_id))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, storage_id = storage_id, "URL resolution failed");
                Self::request_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "storage service returned HTTP {} for reference {}",
                status, storage_id
            ));
        }

        let resolved: ResolveUrlResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid resolve response: {}", e))?;

        tracing::debug!(
            storage_id = storage_id,
            url = %resolved.url,
            "Storage reference resolved"
        );

        Ok(resolved.url)
    }
}
