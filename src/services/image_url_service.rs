use std::sync::Arc;

use url::Url;

use crate::{models::Product, store::ObjectStore};

/// Maps stored image references to displayable URLs and back.
///
/// References come in two shapes: bare storage paths (`<product>/<file>`) and
/// absolute URLs saved by older records. Both are accepted everywhere.
#[derive(Clone)]
pub struct ImageResolver {
    storage: Arc<dyn ObjectStore>,
}

impl ImageResolver {
    pub fn new(storage: Arc<dyn ObjectStore>) -> Self {
        Self { storage }
    }

    pub fn to_display_url(&self, reference: &str) -> String {
        if reference.is_empty() {
            return String::new();
        }
        if reference.starts_with("http") {
            return reference.to_string();
        }

        self.storage.public_url(reference)
    }

    /// Inverse of [`Self::to_display_url`] for URLs pointing into the bucket.
    /// Anything that is not a URL is returned as-is.
    pub fn to_stored_path(&self, url_or_path: &str) -> String {
        let Ok(url) = Url::parse(url_or_path) else {
            return url_or_path.to_string();
        };
        let Some(segments) = url.path_segments() else {
            return url_or_path.to_string();
        };

        let segments: Vec<&str> = segments.collect();
        let bucket = self.storage.bucket();
        match segments.iter().position(|segment| *segment == bucket) {
            Some(idx) => segments[idx + 1..]
                .iter()
                .map(|segment| {
                    urlencoding::decode(segment)
                        .map(|s| s.into_owned())
                        .unwrap_or_else(|_| segment.to_string())
                })
                .collect::<Vec<_>>()
                .join("/"),
            None => url_or_path.to_string(),
        }
    }

    /// Gallery for a product: the image list, or the legacy single image when
    /// the list is empty, resolved and with unresolvable entries dropped.
    pub fn display_images(&self, product: &Product) -> Vec<String> {
        product
            .image_refs()
            .into_iter()
            .map(|reference| self.to_display_url(reference))
            .filter(|url| !url.is_empty())
            .collect()
    }

    pub fn primary_image(&self, product: &Product) -> Option<String> {
        self.display_images(product).into_iter().next()
    }
}

/// Clamps a selected gallery position to a valid index, falling back to the
/// first image.
pub fn gallery_index(selected: i64, len: usize) -> usize {
    if selected >= 0 && (selected as u64) < len as u64 {
        selected as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::store::MemoryObjectStore;

    const BASE: &str = "https://project.storage.example";

    fn resolver() -> ImageResolver {
        ImageResolver::new(Arc::new(MemoryObjectStore::new("product-images", BASE)))
    }

    fn product(image_urls: Vec<&str>, image_url: Option<&str>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Gloss".to_string(),
            description: None,
            price: None,
            stock_quantity: 3,
            brand: None,
            color: None,
            size: None,
            code: None,
            image_urls: image_urls.into_iter().map(String::from).collect(),
            image_url: image_url.map(String::from),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn display_url_handles_empty_absolute_and_stored() {
        let resolver = resolver();

        assert_eq!(resolver.to_display_url(""), "");
        assert_eq!(resolver.to_display_url("http://x/y.png"), "http://x/y.png");
        assert_eq!(
            resolver.to_display_url("abc/1.png"),
            format!("{}/storage/v1/object/public/product-images/abc/1.png", BASE)
        );
    }

    #[test]
    fn stored_path_inverts_display_url() {
        let resolver = resolver();

        for path in ["abc/1.png", "1700000000000-ab12cd3.jpg", "p/with space.webp"] {
            let url = resolver.to_display_url(path);
            assert_eq!(resolver.to_stored_path(&url), path);
        }
    }

    #[test]
    fn stored_path_passes_through_non_urls_and_foreign_urls() {
        let resolver = resolver();

        assert_eq!(resolver.to_stored_path("abc/1.png"), "abc/1.png");
        assert_eq!(
            resolver.to_stored_path("https://cdn.example.com/other/1.png"),
            "https://cdn.example.com/other/1.png"
        );
    }

    #[test]
    fn display_images_falls_back_to_legacy_field() {
        let resolver = resolver();

        let legacy = product(vec![], Some("http://old.example/a.png"));
        assert_eq!(resolver.display_images(&legacy), vec!["http://old.example/a.png"]);

        let modern = product(vec!["p/1.png", "http://x/2.png"], Some("http://old/ignored.png"));
        let images = resolver.display_images(&modern);
        assert_eq!(images.len(), 2);
        assert_eq!(images[1], "http://x/2.png");
        assert_eq!(resolver.primary_image(&modern), Some(images[0].clone()));

        assert!(resolver.display_images(&product(vec![], None)).is_empty());
    }

    #[test]
    fn gallery_index_is_always_in_bounds() {
        assert_eq!(gallery_index(2, 3), 2);
        assert_eq!(gallery_index(3, 3), 0);
        assert_eq!(gallery_index(-1, 3), 0);
        assert_eq!(gallery_index(0, 0), 0);
    }
}
