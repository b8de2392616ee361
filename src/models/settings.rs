use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SettingsRow {
    pub id: Uuid,
    pub store_name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub opening_hours: Option<String>,
}

/// Store-wide settings. A missing row reads as all-empty defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub store_name: String,
    pub whatsapp_number: String,
    pub phone_number: String,
    pub address: String,
    pub opening_hours: String,
}

impl Settings {
    pub fn has_whatsapp(&self) -> bool {
        self.whatsapp_number.chars().any(|c| c.is_ascii_digit())
    }
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        Self {
            store_name: row.store_name.unwrap_or_default(),
            whatsapp_number: row.whatsapp_number.unwrap_or_default(),
            phone_number: row.phone_number.unwrap_or_default(),
            address: row.address.unwrap_or_default(),
            opening_hours: row.opening_hours.unwrap_or_default(),
        }
    }
}

pub type SettingsRequest = Settings;
