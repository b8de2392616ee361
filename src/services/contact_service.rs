//! Contact messages. Only `submit` is routed publicly. Listing, flagging
//! and deleting are library API for an admin front end.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{ContactMessage, DEFAULT_MESSAGE_LIMIT, MessageFlag, NewContactMessage},
    services::outcome::Outcome,
    store::MessageStore,
};

#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn MessageStore>,
}

impl ContactService {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    pub async fn submit(&self, message: NewContactMessage) -> Result<ContactMessage> {
        let message = NewContactMessage {
            name: required(&message.name, "name")?,
            phone: required(&message.phone, "phone")?,
            email: message
                .email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            message: required(&message.message, "message")?,
        };

        let created = self.store.insert_message(&message).await?;

        tracing::info!(id = %created.id, "Contact message received");

        Ok(created)
    }

    /// Newest first.
    pub async fn list(&self, limit: Option<i64>, offset: Option<i64>) -> Outcome<Vec<ContactMessage>> {
        let limit = limit.unwrap_or(DEFAULT_MESSAGE_LIMIT).max(0);
        let offset = offset.unwrap_or(0).max(0);

        Outcome::from_result(
            "list_messages",
            self.store.list_messages(limit, offset).await,
            Vec::new(),
        )
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<()> {
        self.set_flag(id, MessageFlag::Read).await
    }

    pub async fn mark_replied(&self, id: Uuid) -> Result<()> {
        self.set_flag(id, MessageFlag::Replied).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete_message(id).await? {
            return Err(AppError::NotFound(format!("Message {} not found", id)));
        }
        Ok(())
    }

    async fn set_flag(&self, id: Uuid, flag: MessageFlag) -> Result<()> {
        if !self.store.set_message_flag(id, flag).await? {
            return Err(AppError::NotFound(format!("Message {} not found", id)));
        }
        Ok(())
    }
}

fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn message(name: &str, email: Option<&str>) -> NewContactMessage {
        NewContactMessage {
            name: name.to_string(),
            phone: "555-0100".to_string(),
            email: email.map(String::from),
            message: "Do you stock primer?".to_string(),
        }
    }

    #[tokio::test]
    async fn submit_trims_and_drops_blank_email() {
        let service = ContactService::new(Arc::new(MemoryStore::new()));

        let created = service.submit(message("  Dana ", Some("  "))).await.unwrap();

        assert_eq!(created.name, "Dana");
        assert_eq!(created.email, None);
        assert!(!created.read);
        assert!(!created.replied);
    }

    #[tokio::test]
    async fn submit_requires_fields() {
        let service = ContactService::new(Arc::new(MemoryStore::new()));

        let err = service.submit(message(" ", None)).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn flags_and_delete_report_unknown_ids() {
        let service = ContactService::new(Arc::new(MemoryStore::new()));
        let created = service
            .submit(message("Dana", Some("dana@example.com")))
            .await
            .unwrap();

        service.mark_read(created.id).await.unwrap();
        service.mark_replied(created.id).await.unwrap();
        let listed = service.list(None, None).await.into_value();
        assert!(listed[0].read && listed[0].replied);

        service.delete(created.id).await.unwrap();
        assert!(matches!(
            service.delete(created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.mark_read(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_degrades_and_writes_propagate_on_failure() {
        let store = MemoryStore::new();
        let service = ContactService::new(Arc::new(store.clone()));
        store.set_offline(true).await;

        let listed = service.list(Some(10), None).await;
        assert!(listed.is_degraded());
        assert!(listed.into_value().is_empty());

        assert!(matches!(
            service.submit(message("Dana", None)).await,
            Err(AppError::DatabaseError(_))
        ));
    }
}
