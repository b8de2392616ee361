use async_trait::async_trait;
use aws_sdk_s3 as s3;
use aws_sdk_s3::{error::DisplayErrorContext, primitives::ByteStream};

use crate::{
    error::{AppError, Result},
    store::{ObjectStore, UploadOptions},
};

/// Product images kept in an S3 bucket and served from `assets_url` with
/// path-style keys: `{assets_url}/{bucket}/{path}`.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: s3::Client,
    bucket: String,
    assets_url: String,
}

impl S3ObjectStore {
    pub fn new(client: s3::Client, bucket: impl Into<String>, assets_url: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            assets_url: assets_url.into(),
        }
    }
}

/// Percent-encodes each segment of a stored path, keeping the separators.
pub(crate) fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(&self, path: &str, bytes: Vec<u8>, options: &UploadOptions) -> Result<String> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(ByteStream::from(bytes))
            .content_type(&options.content_type)
            .cache_control(&options.cache_control);

        if !options.upsert {
            request = request.if_none_match("*");
        }

        request.send().await.map_err(|e| {
            AppError::StorageError(format!(
                "Failed to upload {}: {}",
                path,
                DisplayErrorContext(&e)
            ))
        })?;

        Ok(path.to_string())
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        for key in paths {
            self.client
                .delete_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    AppError::StorageError(format!(
                        "Failed to delete {}: {}",
                        key,
                        DisplayErrorContext(&e)
                    ))
                })?;
        }

        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() || self.assets_url.is_empty() {
            return String::new();
        }

        format!(
            "{}/{}/{}",
            self.assets_url.trim_end_matches('/'),
            self.bucket,
            encode_path(path)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> S3ObjectStore {
        let config = s3::Config::builder()
            .behavior_version(s3::config::BehaviorVersion::latest())
            .region(s3::config::Region::new("us-east-1"))
            .build();
        S3ObjectStore::new(
            s3::Client::from_conf(config),
            "product-images",
            "https://assets.example.com/",
        )
    }

    #[test]
    fn public_url_is_path_style_and_encoded() {
        let store = store();

        assert_eq!(
            store.public_url("p1/wall paint.png"),
            "https://assets.example.com/product-images/p1/wall%20paint.png"
        );
        assert_eq!(store.public_url(""), "");
    }
}
