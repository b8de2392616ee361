pub mod catalog_service;
pub mod contact_service;
pub mod image_upload_service;
pub mod image_url_service;
pub mod link_service;
pub mod outcome;
pub mod settings_service;

pub use catalog_service::CatalogService;
pub use contact_service::ContactService;
pub use image_upload_service::{ImageFile, ImageUploadService};
pub use image_url_service::{ImageResolver, gallery_index};
pub use outcome::Outcome;
pub use settings_service::SettingsService;
