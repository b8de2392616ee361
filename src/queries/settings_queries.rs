use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{Settings, SettingsRow},
};

const SETTINGS_COLUMNS: &str = "id, store_name, whatsapp_number, phone_number, address, opening_hours";

pub async fn find_first(pool: &PgPool) -> Result<Option<SettingsRow>> {
    let settings = sqlx::query_as::<_, SettingsRow>(&format!(
        "SELECT {} FROM settings LIMIT 1",
        SETTINGS_COLUMNS
    ))
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}

pub async fn insert_settings(pool: &PgPool, settings: &Settings) -> Result<SettingsRow> {
    let row = sqlx::query_as::<_, SettingsRow>(&format!(
        "INSERT INTO settings (store_name, whatsapp_number, phone_number, address, opening_hours)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (singleton) DO UPDATE SET
             store_name = EXCLUDED.store_name,
             whatsapp_number = EXCLUDED.whatsapp_number,
             phone_number = EXCLUDED.phone_number,
             address = EXCLUDED.address,
             opening_hours = EXCLUDED.opening_hours,
             updated_at = NOW()
         RETURNING {}",
        SETTINGS_COLUMNS
    ))
    .bind(&settings.store_name)
    .bind(&settings.whatsapp_number)
    .bind(&settings.phone_number)
    .bind(&settings.address)
    .bind(&settings.opening_hours)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update_settings(pool: &PgPool, id: Uuid, settings: &Settings) -> Result<SettingsRow> {
    let row = sqlx::query_as::<_, SettingsRow>(&format!(
        r#"
        UPDATE settings
        SET
            store_name = $1,
            whatsapp_number = $2,
            phone_number = $3,
            address = $4,
            opening_hours = $5,
            updated_at = NOW()
        WHERE id = $6
        RETURNING {}
        "#,
        SETTINGS_COLUMNS
    ))
    .bind(&settings.store_name)
    .bind(&settings.whatsapp_number)
    .bind(&settings.phone_number)
    .bind(&settings.address)
    .bind(&settings.opening_hours)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
