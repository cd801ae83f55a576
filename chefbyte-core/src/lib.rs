pub mod config;
pub mod db;
pub mod error;
pub mod genai;
pub mod mail;
pub mod models;
pub mod reply;

pub use config::ChefByteConfig;
pub use error::ChefByteError;
pub use genai::{ChatBackend, GenAiConfig, GenAiError, GeminiChatClient, SYSTEM_PROMPT};
pub use mail::{ContactMessage, MailError, Mailer, SmtpConfig, SmtpMailer};
pub use models::{Conversation, Message, Role, SavedRecipe};
pub use reply::{classify, RecipeCard, Reply};
