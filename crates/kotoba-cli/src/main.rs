//! Kotoba CLI - LINE bot operator tool
//!
//! Push messages and weather cards, publish notifications and simulate
//! webhook deliveries against a Kotoba server.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};
use tracing_subscriber::EnvFilter;

use api::KotobaClient;
use config::Config;

#[derive(Parser)]
#[command(name = "kotoba")]
#[command(about = "Kotoba CLI - LINE bot operator tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Log HTTP activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
        /// Server URL to store alongside the key
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Manage recipients (LINE ID shortcuts)
    Recipient {
        #[command(subcommand)]
        action: RecipientAction,
    },

    /// Push a text message
    Push {
        /// Message text (will prompt if not provided)
        text: Option<String>,
        /// Recipient name or LINE ID (defaults to the default recipient)
        #[arg(short, long)]
        to: Option<String>,
    },

    /// Push the weather for a city
    PushWeather {
        /// City, e.g. 台北, taichung, 花蓮縣
        city: String,
        /// Recipient name or LINE ID (defaults to the default recipient)
        #[arg(short, long)]
        to: Option<String>,
    },

    /// Show the forecast for a city
    Weather {
        city: String,
    },

    /// Publish a notification
    Notify {
        message: String,
        /// Only deliver to this user's subscribers
        #[arg(short, long)]
        user: Option<String>,
        /// JSON payload
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Send a fake LINE text message to the webhook
    Simulate {
        text: String,
        /// Source user ID for the fake event
        #[arg(short, long, default_value = "Ukotobacli")]
        user: String,
        /// Channel secret used to sign the body (or LINE_CHANNEL_SECRET)
        #[arg(long)]
        secret: Option<String>,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum RecipientAction {
    /// Add a new recipient
    Add {
        /// Recipient name (e.g., "me", "family")
        name: String,
        /// LINE user, group or room ID
        #[arg(long)]
        user_id: String,
        /// Display name (optional)
        #[arg(long)]
        display_name: Option<String>,
    },
    /// List all recipients
    List,
    /// Set default recipient
    Set {
        /// Recipient name to set as default
        name: String,
    },
    /// Remove a recipient
    Remove {
        /// Recipient name to remove
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "debug" } else { "warn" });

    match cli.command {
        Commands::Login { key, base_url } => cmd_login(key, base_url).await,
        Commands::Recipient { action } => cmd_recipient(action),
        Commands::Push { text, to } => cmd_push(text, to).await,
        Commands::PushWeather { city, to } => cmd_push_weather(city, to).await,
        Commands::Weather { city } => cmd_weather(city).await,
        Commands::Notify { message, user, data } => cmd_notify(message, user, data).await,
        Commands::Simulate { text, user, secret } => cmd_simulate(text, user, secret).await,
        Commands::Config => cmd_config(),
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Saved config with environment overrides applied
fn load_config() -> Result<Config> {
    Ok(Config::load()?.with_overrides(|key| std::env::var(key).ok()))
}

fn client_for(config: &Config) -> Result<KotobaClient> {
    tracing::debug!(base_url = %config.base_url, "Using Kotoba API");
    KotobaClient::new(&config.base_url, config.api_key.as_deref())
}

fn recipient(config: &Config, to: Option<&str>) -> Result<String> {
    config
        .resolve_recipient(to)
        .context("No recipient given and no default set. Use -t <name|ID> or 'kotoba recipient set'.")
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>, base_url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test connection
    let client = KotobaClient::new(&config.base_url, Some(&api_key))?;
    print!("Testing connection... ");

    match client.health().await {
        Ok(health) => {
            println!("{} (v{})", "OK".green(), health.version);
        }
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("Could not connect to Kotoba API at {}: {}", config.base_url, e);
        }
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);

    if config.recipients.is_empty() {
        println!("\n{}", "Tip: Save a recipient to avoid typing LINE IDs:".yellow());
        println!("  kotoba recipient add me --user-id <LINE_USER_ID>");
        println!("  kotoba recipient set me");
    }

    Ok(())
}

fn cmd_recipient(action: RecipientAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        RecipientAction::Add { name, user_id, display_name } => {
            config.add_recipient(name.clone(), user_id.clone(), display_name);
            config.save()?;
            println!("{} Recipient '{}' added ({})", "✓".green(), name, user_id);
        }

        RecipientAction::List => {
            if config.recipients.is_empty() {
                println!("No recipients configured.");
                println!("\n{}", "Add one with:".dimmed());
                println!("  kotoba recipient add <name> --user-id <LINE_USER_ID>");
                return Ok(());
            }

            let mut names: Vec<&String> = config.recipients.keys().collect();
            names.sort();

            println!("{}", "Recipients:".bold());
            for name in names {
                let recipient = &config.recipients[name];
                let is_default = config.default_recipient.as_ref() == Some(name);
                let default_marker = if is_default { " (default)".green().to_string() } else { String::new() };
                let display_name = recipient.name.as_deref().unwrap_or("-");

                println!(
                    "  {} {} ({}){}",
                    name.cyan(),
                    display_name.dimmed(),
                    truncate_string(&recipient.user_id, 12),
                    default_marker
                );
            }
        }

        RecipientAction::Set { name } => {
            if config.set_default_recipient(name.clone()) {
                config.save()?;
                println!("{} Default recipient set to '{}'", "✓".green(), name);
            } else {
                bail!("Recipient '{}' not found", name);
            }
        }

        RecipientAction::Remove { name } => {
            if config.remove_recipient(&name) {
                config.save()?;
                println!("{} Recipient '{}' removed", "✓".green(), name);
            } else {
                bail!("Recipient '{}' not found", name);
            }
        }
    }

    Ok(())
}

async fn cmd_push(text: Option<String>, to: Option<String>) -> Result<()> {
    let config = load_config()?;
    let target = recipient(&config, to.as_deref())?;

    let text = match text {
        Some(t) => t,
        None => Input::new()
            .with_prompt("Message")
            .interact_text()
            .context("Failed to read input")?,
    };

    let resp = client_for(&config)?.push_text(&target, &text).await?;
    println!("{} Pushed to {}", "✓".green(), resp.to.cyan());
    println!("  {}", truncate_string(&text, 80).dimmed());

    Ok(())
}

async fn cmd_push_weather(city: String, to: Option<String>) -> Result<()> {
    let config = load_config()?;
    let target = recipient(&config, to.as_deref())?;

    let resp = client_for(&config)?.push_weather(&target, &city).await?;
    let kind = resp.kinds.first().map(String::as_str).unwrap_or("-");
    let label = if kind == "flex" { kind.green() } else { kind.yellow() };

    println!("{} Weather for {} pushed to {} [{}]", "✓".green(), city.cyan(), resp.to.cyan(), label);
    if kind != "flex" {
        println!("  {}", "Lookup failed on the server; a fallback text was sent.".dimmed());
    }

    Ok(())
}

async fn cmd_weather(city: String) -> Result<()> {
    let config = load_config()?;
    let forecast = client_for(&config)?.weather(&city).await?;

    if forecast.periods.is_empty() {
        println!("No forecast available for {}", forecast.city);
        return Ok(());
    }

    println!("{}", format!("{} 天氣預報", forecast.city).bold());
    for period in forecast.periods {
        let rain = period
            .rain_probability
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| "-".to_string());
        let rain = match period.rain_probability {
            Some(p) if p >= 60 => rain.red(),
            Some(p) if p >= 30 => rain.yellow(),
            _ => rain.green(),
        };

        println!(
            "  {} ~ {}  {}  {}  ☔ {}  {}",
            period.start_time.dimmed(),
            period.end_time.dimmed(),
            period.description.cyan(),
            period.temperature.as_deref().unwrap_or("-"),
            rain,
            period.comfort.as_deref().unwrap_or("").dimmed()
        );
    }

    Ok(())
}

async fn cmd_notify(message: String, user: Option<String>, data: Option<String>) -> Result<()> {
    let config = load_config()?;

    let data = match data {
        Some(raw) => serde_json::from_str(&raw).context("--data must be valid JSON")?,
        None => serde_json::Value::Null,
    };

    let resp = client_for(&config)?
        .notify(user.as_deref(), &message, data)
        .await?;

    let audience = user.as_deref().unwrap_or("everyone");
    println!(
        "{} Notification {} sent to {} ({} subscribers)",
        "✓".green(),
        resp.id.to_string().dimmed(),
        audience.cyan(),
        resp.delivered
    );

    Ok(())
}

async fn cmd_simulate(text: String, user: String, secret: Option<String>) -> Result<()> {
    let config = load_config()?;
    let secret = secret.or_else(|| std::env::var("LINE_CHANNEL_SECRET").ok());

    let resp = client_for(&config)?
        .simulate(&text, &user, secret.as_deref())
        .await?;

    if resp.replies.is_empty() {
        println!("No reply was produced.");
        return Ok(());
    }

    for reply in resp.replies {
        // Stdout stays clean JSON for piping
        println!("{}", serde_json::to_string_pretty(&reply)?);
    }

    Ok(())
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}

fn cmd_config() -> Result<()> {
    let config = load_config()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() { "Set".green() } else { "Not set".red() }
    );
    println!(
        "  Default Recipient: {}",
        config.default_recipient.as_deref().unwrap_or("None").cyan()
    );
    println!("  Recipients: {}", config.recipients.len());

    Ok(())
}
