use std::sync::Arc;

use chefbyte_core::{
    ChatBackend, ChefByteConfig, GenAiConfig, GeminiChatClient, Mailer, SmtpConfig, SmtpMailer,
};
use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use chefbyte_server::http::{self, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "chefbyte.toml")]
    config: String,

    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Init logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // Load config
    let config = match ChefByteConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Connect to DB
    let pool = match chefbyte_core::db::create_pool(&config.database).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if args.health {
        match chefbyte_core::db::health_check(&pool).await {
            Ok(v) => println!("✅ PostgreSQL connected: {}", v),
            Err(e) => {
                println!("❌ PostgreSQL connection failed: {}", e);
                std::process::exit(1);
            }
        }

        println!("✅ ChefByte DB health check passed");
        return Ok(());
    }

    chefbyte_core::db::init_schema(&pool).await?;

    // The model credential is fatal when missing; mail credentials only
    // disable the contact endpoint.
    let genai_config = GenAiConfig::new(None, config.genai.model.clone());
    let chat: Arc<dyn ChatBackend> = match GeminiChatClient::new(genai_config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Failed to create Gemini client: {} (is GEMINI_API_KEY set?)", e);
            std::process::exit(1);
        }
    };

    let mailer: Option<Arc<dyn Mailer>> = match SmtpConfig::from_env(config.mail.smtp_host.clone())
    {
        Some(smtp) => match SmtpMailer::new(smtp) {
            Ok(m) => Some(Arc::new(m)),
            Err(e) => {
                tracing::warn!("Mailer disabled: {}", e);
                None
            }
        },
        None => {
            tracing::warn!("SMTP credentials not set — contact endpoint disabled");
            None
        }
    };

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    let state = AppState {
        pool,
        config,
        chat,
        mailer,
    };

    http::start_http_server(state, tx.subscribe()).await?;

    Ok(())
}
