use crate::domain::StorageError;
use crate::ports::storage::ObjectStore;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;

/// S3Adapter implements ObjectStore for AWS S3 and S3-compatible providers.
#[derive(Clone)]
pub struct S3Adapter {
    client: Client,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
}

impl S3Adapter {
    pub fn new(client: Client, bucket: String, region: String, endpoint_url: Option<String>) -> Self {
        Self {
            client,
            bucket,
            region,
            endpoint_url,
        }
    }

    /// Build a client from the default AWS credential chain.
    pub async fn from_env(bucket: String, region: String, endpoint_url: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.clone()));
        if let Some(endpoint) = &endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(endpoint_url.is_some())
            .build();
        Self::new(
            Client::from_conf(s3_config),
            bucket,
            region,
            endpoint_url,
        )
    }

    /// Public location of `key`: path-style for custom endpoints, virtual-hosted for AWS.
    fn url_for(&self, key: &str) -> String {
        match &self.endpoint_url {
            Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Adapter {
    async fn put(&self, key: &str, local_path: &Path) -> Result<String, StorageError> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        Ok(self.url_for(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(endpoint_url: Option<&str>) -> S3Adapter {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("eu-west-1"))
            .build();
        S3Adapter::new(
            Client::from_conf(config),
            "videos".to_string(),
            "eu-west-1".to_string(),
            endpoint_url.map(String::from),
        )
    }

    #[test]
    fn test_aws_url_is_virtual_hosted() {
        assert_eq!(
            adapter(None).url_for("abc_dash.mpd"),
            "https://videos.s3.eu-west-1.amazonaws.com/abc_dash.mpd"
        );
    }

    #[test]
    fn test_custom_endpoint_url_is_path_style() {
        assert_eq!(
            adapter(Some("http://minio:9000/")).url_for("abc.mp4"),
            "http://minio:9000/videos/abc.mp4"
        );
    }
}
