//! S3 Storage Client
//!
//! Stores profile images in S3-compatible storage.
//! Supports any S3-compatible backend: AWS S3, MinIO, Backblaze B2, Cloudflare R2.

use aws_config::Region;
use aws_sdk_s3::{
    config::{Credentials, IdentityCache, SharedCredentialsProvider, StalledStreamProtectionConfig},
    primitives::ByteStream,
    Client,
};
use thiserror::Error;
use tracing::info;

use crate::config::Config;

/// S3 client wrapper with configuration.
#[derive(Clone)]
pub struct S3Client {
    client: Client,
    bucket: String,
    public_base: String,
}

/// S3-related errors.
#[derive(Debug, Error)]
pub enum S3Error {
    /// Failed to upload file.
    #[error("Failed to upload file: {0}")]
    Upload(String),

    /// S3 configuration error.
    #[error("S3 configuration error: {0}")]
    Config(String),
}

impl S3Client {
    /// Create a new S3 client from configuration.
    ///
    /// Uses path-style addressing when a custom endpoint is configured.
    pub fn new(config: &Config) -> Self {
        let region_name = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .region(Region::new(region_name.clone()))
            .stalled_stream_protection(StalledStreamProtectionConfig::disabled())
            .identity_cache(IdentityCache::no_cache());

        if let (Ok(access_key), Ok(secret_key)) = (
            std::env::var("AWS_ACCESS_KEY_ID"),
            std::env::var("AWS_SECRET_ACCESS_KEY"),
        ) {
            let credentials = Credentials::new(access_key, secret_key, None, None, "environment");
            s3_config_builder =
                s3_config_builder.credentials_provider(SharedCredentialsProvider::new(credentials));
        }

        if let Some(endpoint) = &config.s3_endpoint {
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }

        let client = Client::from_conf(s3_config_builder.build());
        let public_base = public_base_url(
            config.s3_public_url.as_deref(),
            config.s3_endpoint.as_deref(),
            &config.s3_bucket,
            &region_name,
        );

        info!(
            bucket = %config.s3_bucket,
            endpoint = ?config.s3_endpoint,
            public_base = %public_base,
            "S3 client initialized"
        );

        Self {
            client,
            bucket: config.s3_bucket.clone(),
            public_base,
        }
    }

    /// Upload an object and return its public URL.
    pub async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, S3Error> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| S3Error::Upload(e.to_string()))?;

        Ok(self.public_url(key))
    }

    /// Public URL of an object.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }

    /// Check if the bucket is accessible (health check).
    pub async fn health_check(&self) -> Result<(), S3Error> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| S3Error::Config(format!("Bucket not accessible: {e}")))?;

        Ok(())
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Base URL objects are served from, without a trailing slash.
fn public_base_url(
    public_url: Option<&str>,
    endpoint: Option<&str>,
    bucket: &str,
    region: &str,
) -> String {
    match (public_url, endpoint) {
        (Some(url), _) => url.trim_end_matches('/').to_string(),
        (None, Some(endpoint)) => format!("{}/{bucket}", endpoint.trim_end_matches('/')),
        (None, None) => format!("https://{bucket}.s3.{region}.amazonaws.com"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_base_prefers_explicit_url() {
        assert_eq!(
            public_base_url(Some("https://cdn.example.com/"), Some("http://minio:9000"), "vivah", "us-east-1"),
            "https://cdn.example.com"
        );
    }

    #[test]
    fn test_public_base_for_custom_endpoint_is_path_style() {
        assert_eq!(
            public_base_url(None, Some("http://minio:9000/"), "vivah", "us-east-1"),
            "http://minio:9000/vivah"
        );
    }

    #[test]
    fn test_public_base_defaults_to_aws() {
        assert_eq!(
            public_base_url(None, None, "vivah", "ap-south-1"),
            "https://vivah.s3.ap-south-1.amazonaws.com"
        );
    }
}
