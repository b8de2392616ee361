use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{ContactMessage, MessageFlag, NewContactMessage},
};

pub async fn create_message(pool: &PgPool, message: &NewContactMessage) -> Result<ContactMessage> {
    let created = sqlx::query_as::<_, ContactMessage>(
        "INSERT INTO contact_messages (name, phone, email, message)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(&message.name)
    .bind(&message.phone)
    .bind(&message.email)
    .bind(&message.message)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub async fn list_messages(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<ContactMessage>> {
    let messages = sqlx::query_as::<_, ContactMessage>(
        "SELECT * FROM contact_messages
         ORDER BY created_at DESC
         LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

pub async fn set_flag(pool: &PgPool, id: Uuid, flag: MessageFlag) -> Result<bool> {
    // column name comes from a closed enum, never from input
    let result = sqlx::query(&format!(
        "UPDATE contact_messages SET {} = true WHERE id = $1",
        flag.column()
    ))
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_message(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
