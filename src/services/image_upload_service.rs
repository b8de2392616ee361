//! Product image uploads and deletions.
//!
//! Library API for an admin front end; no public route calls it because
//! admin authentication lives outside this crate.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use rand::{Rng, distr::Alphanumeric};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    services::image_url_service::ImageResolver,
    store::{ObjectStore, UploadOptions},
};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const CACHE_CONTROL: &str = "max-age=3600";
const NAME_SUFFIX_LEN: usize = 7;

#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ImageUploadService {
    storage: Arc<dyn ObjectStore>,
    resolver: ImageResolver,
}

impl ImageUploadService {
    pub fn new(storage: Arc<dyn ObjectStore>) -> Self {
        Self {
            resolver: ImageResolver::new(storage.clone()),
            storage,
        }
    }

    /// Validates and stores one image, returning its stored path.
    pub async fn upload_image(&self, file: ImageFile, product_id: Option<Uuid>) -> Result<String> {
        if !file.content_type.starts_with("image/") {
            return Err(AppError::ValidationError("File must be an image".to_string()));
        }
        if file.bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::ValidationError(
                "Image size must be less than 5MB".to_string(),
            ));
        }

        let file_name = generate_file_name(&file.file_name);
        let path = match product_id {
            Some(id) => format!("{}/{}", id, file_name),
            None => file_name,
        };

        let options = UploadOptions {
            content_type: file.content_type,
            cache_control: CACHE_CONTROL.to_string(),
            upsert: false,
        };

        self.storage
            .upload(&path, file.bytes, &options)
            .await
            .map_err(|err| match err {
                AppError::StorageError(msg) if is_missing_bucket(&msg) => {
                    AppError::ConfigError(format!(
                        "Storage bucket \"{}\" not found; create it before uploading images",
                        self.storage.bucket()
                    ))
                }
                other => other,
            })
    }

    /// Uploads all files concurrently and returns the stored paths of the
    /// ones that succeeded, in input order.
    pub async fn upload_images(&self, files: Vec<ImageFile>, product_id: Option<Uuid>) -> Vec<String> {
        let uploads = files
            .into_iter()
            .map(|file| self.upload_image(file, product_id));

        join_all(uploads)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(path) => Some(path),
                Err(err) => {
                    tracing::warn!(error = %err, "image upload failed");
                    None
                }
            })
            .collect()
    }

    /// Deletes an image given either its public URL or its stored path.
    pub async fn delete_image(&self, url_or_path: &str) -> bool {
        let path = self.resolver.to_stored_path(url_or_path);

        match self.storage.remove(&[path.clone()]).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(%path, error = %err, "Error deleting image");
                false
            }
        }
    }
}

fn is_missing_bucket(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("bucket not found") || message.contains("nosuchbucket")
}

/// `<unix millis>-<7 random chars>.<ext>`, keeping the original extension.
fn generate_file_name(original: &str) -> String {
    let extension = original
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("bin");

    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(NAME_SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();

    format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryObjectStore;

    fn image(name: &str, content_type: &str, size: usize) -> ImageFile {
        ImageFile {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0u8; size],
        }
    }

    fn setup() -> (MemoryObjectStore, ImageUploadService) {
        let objects = MemoryObjectStore::new("product-images", "https://storage.example");
        let service = ImageUploadService::new(Arc::new(objects.clone()));
        (objects, service)
    }

    #[test]
    fn file_names_keep_extension_and_are_unique() {
        let a = generate_file_name("photo.final.JPG");
        let b = generate_file_name("photo.final.JPG");

        assert!(a.ends_with(".JPG"));
        assert_ne!(a, b);

        let (millis, rest) = a.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(rest.split_once('.').unwrap().0.len(), NAME_SUFFIX_LEN);

        assert!(generate_file_name("noext").ends_with(".bin"));
    }

    #[tokio::test]
    async fn upload_places_file_under_product_folder() {
        let (objects, service) = setup();
        let product_id = Uuid::new_v4();

        let path = service
            .upload_image(image("wall.png", "image/png", 10), Some(product_id))
            .await
            .unwrap();

        assert!(path.starts_with(&format!("{}/", product_id)));
        assert!(path.ends_with(".png"));
        assert!(objects.contains(&path).await);

        let options = objects.options_for(&path).await.unwrap();
        assert_eq!(options.cache_control, "max-age=3600");
        assert!(!options.upsert);
    }

    #[tokio::test]
    async fn upload_rejects_non_images_and_oversized_files() {
        let (objects, service) = setup();

        let err = service
            .upload_image(image("notes.txt", "text/plain", 10), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = service
            .upload_image(image("big.png", "image/png", MAX_IMAGE_BYTES + 1), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        assert!(objects.paths().await.is_empty());
    }

    #[tokio::test]
    async fn upload_many_keeps_only_successes() {
        let (objects, service) = setup();

        let paths = service
            .upload_images(
                vec![
                    image("a.png", "image/png", 1),
                    image("b.txt", "text/plain", 1),
                    image("c.webp", "image/webp", 1),
                ],
                None,
            )
            .await;

        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with(".png"));
        assert!(paths[1].ends_with(".webp"));
        assert_eq!(objects.paths().await.len(), 2);
    }

    #[tokio::test]
    async fn delete_accepts_url_or_path() {
        let (objects, service) = setup();
        let resolver = ImageResolver::new(Arc::new(objects.clone()));

        let first = service
            .upload_image(image("a.png", "image/png", 1), None)
            .await
            .unwrap();
        let second = service
            .upload_image(image("b.png", "image/png", 1), Some(Uuid::new_v4()))
            .await
            .unwrap();

        assert!(service.delete_image(&first).await);
        assert!(service.delete_image(&resolver.to_display_url(&second)).await);
        assert!(objects.paths().await.is_empty());

        objects.set_offline(true).await;
        assert!(!service.delete_image("a.png").await);
    }
}
