pub mod category_queries;
pub mod message_queries;
pub mod products_queries;
pub mod settings_queries;
