//! chefbyte-cli — terminal frontend for the ChefByte cooking-assistant API
//!
//! # Subcommands
//! - `chat <message> [--session <id>] [--json]` — send one chat message
//! - `recipes --session <id> [--json]`          — list saved recipes
//! - `status`                                   — show server health

use clap::{Parser, Subcommand};
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "chefbyte-cli",
    version,
    about = "ChefByte cooking assistant — terminal client"
)]
struct Cli {
    /// ChefByte HTTP server URL (overrides CHEFBYTE_API_URL env var)
    #[arg(long, env = "CHEFBYTE_API_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Send one chat message
    Chat {
        /// Message text to send
        message: String,

        /// Session id to continue an existing conversation
        #[arg(short, long)]
        session: Option<String>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// List recipes saved in a session
    Recipes {
        /// Session id whose recipes to list
        #[arg(short, long)]
        session: String,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Show ChefByte server status
    Status,
}

// ============================================================================
// API Response Types
// ============================================================================

/// The chat response from POST /api/chat
#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
    session_id: String,
    is_recipe: bool,
    recipe_data: Option<serde_json::Value>,
}

/// The listing response from GET /api/my_recipes
#[derive(Debug, Deserialize)]
struct RecipesResponse {
    recipes: Vec<serde_json::Value>,
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

/// Send one chat message and print the reply.
fn do_chat(server: &str, message: &str, session: Option<&str>, json_output: bool) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;

    let url = format!("{}/api/chat", server);
    let mut body = serde_json::json!({ "message": message });
    if let Some(session_id) = session {
        body["session_id"] = serde_json::json!(session_id);
    }

    let resp = match client.post(&url).json(&body).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("chefbyte-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        eprintln!("chefbyte-cli: server returned {}: {}", status, body);
        std::process::exit(1);
    }

    if json_output {
        let raw: serde_json::Value = resp.json()?;
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    let chat_resp: ChatResponse = match resp.json() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("chefbyte-cli: failed to parse chat response: {}", e);
            std::process::exit(1);
        }
    };

    if chat_resp.is_recipe {
        print_recipe(chat_resp.recipe_data.as_ref().unwrap_or(&serde_json::Value::Null));
    } else {
        println!("{}", chat_resp.response);
    }
    println!();
    println!("(session: {})", chat_resp.session_id);

    Ok(())
}

/// Render a recipe object as readable text.
fn print_recipe(recipe: &serde_json::Value) {
    if let Some(title) = recipe["title"].as_str() {
        println!("# {}", title);
    }
    if let Some(description) = recipe["description"].as_str() {
        println!("{}", description);
    }

    for (label, key) in [("Prep", "prep_time"), ("Cook", "cook_time"), ("Serves", "servings")] {
        if let Some(value) = recipe[key].as_str() {
            println!("{}: {}", label, value);
        }
    }

    if let Some(ingredients) = recipe["ingredients"].as_array() {
        println!("\nIngredients:");
        for item in ingredients {
            println!("  - {}", item.as_str().unwrap_or_default());
        }
    }
    if let Some(instructions) = recipe["instructions"].as_array() {
        println!("\nInstructions:");
        for (i, step) in instructions.iter().enumerate() {
            println!("  {}. {}", i + 1, step.as_str().unwrap_or_default());
        }
    }
}

/// List the recipes saved in a session.
fn do_recipes(server: &str, session: &str, json_output: bool) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let url = format!("{}/api/my_recipes", server);
    let resp = match client.get(&url).query(&[("session_id", session)]).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("chefbyte-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        eprintln!("chefbyte-cli: server returned {}: {}", status, body);
        std::process::exit(1);
    }

    if json_output {
        let raw: serde_json::Value = resp.json()?;
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    let listing: RecipesResponse = match resp.json() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("chefbyte-cli: failed to parse recipes response: {}", e);
            std::process::exit(1);
        }
    };

    if listing.recipes.is_empty() {
        println!("No saved recipes for session {}", session);
        return Ok(());
    }

    for recipe in &listing.recipes {
        let title = recipe["recipe_data"]["title"].as_str().unwrap_or("(untitled)");
        let id = recipe["recipe_id"].as_str().unwrap_or("?");
        let saved_at = recipe["saved_at"].as_str().unwrap_or("?");
        println!("{}  {}  (saved {})", id, title, saved_at);
    }

    Ok(())
}

/// Show the server status by calling GET /api/health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let url = format!("{}/api/health", server);
    let resp = client.get(&url).send();

    match resp {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("ChefByte server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:         {}", body["version"].as_str().unwrap_or("?"));
            println!("PostgreSQL:      {}", body["postgresql"].as_str().unwrap_or("?"));
            println!("Timestamp:       {}", body["timestamp"].as_str().unwrap_or("?"));
        }
        Ok(r) => {
            let status = r.status();
            eprintln!("chefbyte-cli: server unhealthy (HTTP {})", status);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("chefbyte-cli: cannot reach {} — {}", url, e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Chat {
            message,
            session,
            json,
        } => do_chat(&cli.server, message, session.as_deref(), *json),
        Commands::Recipes { session, json } => do_recipes(&cli.server, session, *json),
        Commands::Status => do_status(&cli.server),
    }
}
