mod category;
mod contact_message;
mod product;
mod settings;

pub use category::*;
pub use contact_message::*;
pub use product::*;
pub use settings::*;
