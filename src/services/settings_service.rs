//! Store settings. `get_settings` backs the public `/settings` route;
//! `save_settings` is library API for an admin front end.

use std::sync::Arc;

use crate::{
    error::Result,
    models::{Settings, SettingsRequest},
    services::outcome::Outcome,
    store::SettingsStore,
};

#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// The singleton settings row, or empty defaults when none exists yet.
    pub async fn get_settings(&self) -> Outcome<Settings> {
        let result = self
            .store
            .find_settings()
            .await
            .map(|row| row.map(Settings::from).unwrap_or_default());

        Outcome::from_result("get_settings", result, Settings::default())
    }

    /// Updates the existing row, creating it on first save.
    pub async fn save_settings(&self, req: SettingsRequest) -> Result<Settings> {
        let row = match self.store.find_settings().await? {
            Some(existing) => self.store.update_settings(existing.id, &req).await?,
            None => self.store.insert_settings(&req).await?,
        };

        tracing::info!("Store settings saved");

        Ok(Settings::from(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sample() -> Settings {
        Settings {
            store_name: "Colour House".to_string(),
            whatsapp_number: "+1 555 0100".to_string(),
            phone_number: "555-0101".to_string(),
            address: "1 Main St".to_string(),
            opening_hours: "Mon-Sat 9-18".to_string(),
        }
    }

    #[tokio::test]
    async fn absent_settings_read_as_defaults() {
        let store = MemoryStore::new();
        let service = SettingsService::new(Arc::new(store));

        let outcome = service.get_settings().await;
        assert_eq!(outcome, Outcome::Loaded(Settings::default()));
        assert!(!outcome.value().has_whatsapp());
    }

    #[tokio::test]
    async fn save_creates_then_updates_single_row() {
        let store = MemoryStore::new();
        let service = SettingsService::new(Arc::new(store.clone()));

        service.save_settings(sample()).await.unwrap();
        let first_id = store.find_settings().await.unwrap().unwrap().id;

        let mut changed = sample();
        changed.store_name = "Colour House & Co".to_string();
        let saved = service.save_settings(changed.clone()).await.unwrap();

        assert_eq!(saved, changed);
        assert_eq!(store.find_settings().await.unwrap().unwrap().id, first_id);
        assert_eq!(service.get_settings().await.into_value(), changed);
    }

    #[tokio::test]
    async fn read_failure_degrades_to_defaults() {
        let store = MemoryStore::new();
        let service = SettingsService::new(Arc::new(store.clone()));
        service.save_settings(sample()).await.unwrap();
        store.set_offline(true).await;

        let outcome = service.get_settings().await;
        assert!(outcome.is_degraded());
        assert_eq!(outcome.into_value(), Settings::default());

        assert!(service.save_settings(sample()).await.is_err());
    }
}
