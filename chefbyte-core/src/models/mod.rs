pub mod conversation;
pub mod message;
pub mod recipe;

pub use conversation::Conversation;
pub use message::{Message, Role};
pub use recipe::SavedRecipe;
