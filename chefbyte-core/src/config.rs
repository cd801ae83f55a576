use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::ChefByteError;

#[derive(Debug, Deserialize, Clone)]
pub struct ChefByteConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub genai: GenAiConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Generative-model section. The API key is NOT configured here — it is
/// read from the `GEMINI_API_KEY` environment variable at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct GenAiConfig {
    pub model: String,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash-latest".to_string(),
        }
    }
}

/// SMTP section. Sender, password, and receiver come from the
/// environment (`SMTP_SENDER_EMAIL`, `SMTP_SENDER_PASSWORD`,
/// `CONTACT_RECEIVER_EMAIL`); only the relay host lives in the file.
#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "https://cookingchatbot.netlify.app".to_string(),
            ],
        }
    }
}

impl ChefByteConfig {
    /// Load from a TOML file, then overlay `CHEFBYTE_`-prefixed
    /// environment variables (nested keys use `__`, e.g.
    /// `CHEFBYTE_SERVICE__PORT=8080`).
    pub fn load(path: &str) -> Result<Self, ChefByteError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("CHEFBYTE").separator("__"))
            .build()?;
        Ok(s.try_deserialize()?)
    }
}
