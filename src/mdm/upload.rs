//! Blob upload of the persisted entity file to the import endpoint.

use crate::error::Result;
use reqwest::header::HeaderValue;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// Placeholder in the configured upload URL that is replaced with the
/// generated blob name.
const FILENAME_PLACEHOLDER: &str = "Filename";

/// Uploads the final entity file to the import blob store.
pub struct EntityUploader {
    client: Client,
    url_template: String,
}

/// Unique blob name for one upload, prefixed with the clone-config name so
/// imports can be traced back to the profile that produced them.
fn blob_filename(clone_config_name: &str) -> String {
    format!("{}-{}.json", clone_config_name, Uuid::new_v4())
}

impl EntityUploader {
    /// Create an uploader for the given URL template (must contain the
    /// `Filename` placeholder).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen in
    /// normal operation)
    pub fn new(url_template: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            url_template,
        }
    }

    /// PUT the file at `path` to the blob store and return the blob name.
    pub async fn upload(&self, path: &Path, clone_config_name: &str) -> Result<String> {
        let filename = blob_filename(clone_config_name);
        let url = self.url_template.replace(FILENAME_PLACEHOLDER, &filename);
        let body = tokio::fs::read(path).await?;

        log::info!("Uploading {} to {}", path.display(), url);

        self.client
            .put(&url)
            .header("x-ms-blob-type", HeaderValue::from_static("BlockBlob"))
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        log::info!("Upload completed: {}", filename);
        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_filename_shape() {
        let name = blob_filename("exartikel_STANDARD");
        assert!(name.starts_with("exartikel_STANDARD-"));
        assert!(name.ends_with(".json"));
        // The UUID keeps repeated uploads of the same profile distinct.
        assert_ne!(name, blob_filename("exartikel_STANDARD"));
    }
}
