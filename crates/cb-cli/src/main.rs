//! Content blocking CLI
//!
//! Inspect list encodings, classify engine reports and dump preferences.

use std::fs;
use std::io::{self, Read, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use cb_core::classify::{classify_cookie_status, is_blocking};
use cb_core::prefs::keys;
use cb_core::{
    AntiTracking, BlockEvent, LoadNotification, Settings, SettingsOverrides, StatusFlags, Taxonomy,
};

#[derive(Parser)]
#[command(name = "cb-cli")]
#[command(about = "Content blocking settings and event classification tools")]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode anti-tracking categories into list preferences
    Encode {
        /// Flag set, e.g. "AD | SOCIAL | CRYPTOMINING"
        #[arg(short, long)]
        categories: String,
    },

    /// Decode a comma-separated list string into categories
    Decode {
        /// Matched list string
        #[arg(short, long)]
        list: String,
    },

    /// Classify engine load notifications
    Classify {
        /// JSON array of notifications, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },

    /// Classify a raw cookie status code
    Status {
        /// Status bits, decimal or 0x-prefixed hex
        #[arg(short, long)]
        code: String,
    },

    /// Print the preference map of a settings node
    Prefs {
        /// JSON overrides applied to the defaults
        #[arg(short, long)]
        overrides: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Encode { categories } => cmd_encode(&categories),
        Commands::Decode { list } => cmd_decode(&list),
        Commands::Classify { input } => cmd_classify(&input),
        Commands::Status { code } => cmd_status(&code),
        Commands::Prefs { overrides } => cmd_prefs(overrides.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn taxonomy() -> Result<Arc<Taxonomy>, String> {
    Taxonomy::standard()
        .map(Arc::new)
        .map_err(|e| format!("Invalid taxonomy: {e}"))
}

fn parse_flags<T: DeserializeOwned>(text: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(text.to_string()))
        .map_err(|e| format!("Invalid flags '{text}': {e}"))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to serialize: {e}"))
}

fn parse_code(text: &str) -> Result<u64, String> {
    let trimmed = text.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => trimmed.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("Invalid status code '{text}': {e}"))
}

fn read_input(input: &str) -> Result<String, String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {e}"))?;
        Ok(buf)
    } else {
        fs::read_to_string(input).map_err(|e| format!("Failed to read '{input}': {e}"))
    }
}

fn cmd_encode(categories: &str) -> Result<(), String> {
    let cat: AntiTracking = parse_flags(categories)?;
    let mut settings = Settings::new(taxonomy()?);
    settings.set_anti_tracking(cat);

    let prefs = settings.to_prefs();
    for key in [
        keys::TRACKING_TABLE,
        keys::CRYPTOMINING_ENABLED,
        keys::CRYPTOMINING_TABLES,
        keys::FINGERPRINTING_ENABLED,
        keys::FINGERPRINTING_TABLES,
        keys::SOCIAL_TRACKING_COOKIES,
        keys::SOCIAL_TRACKING_TABLES,
        keys::EMAIL_TRACKING_ENABLED,
        keys::EMAIL_TRACKING_TABLES,
    ] {
        if let Some(value) = prefs.get(key) {
            println!("{key} = {}", to_json(value)?);
        }
    }
    Ok(())
}

fn cmd_decode(list: &str) -> Result<(), String> {
    let cat = taxonomy()?.classify_anti_tracking(Some(list));
    println!("{}", to_json(&cat)?);
    Ok(())
}

fn cmd_classify(input: &str) -> Result<(), String> {
    let content = read_input(input)?;
    let notifications: Vec<LoadNotification> = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid notifications in '{input}': {e}"))?;
    let taxonomy = taxonomy()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for notification in &notifications {
        let event = BlockEvent::from_notification(&taxonomy, notification);
        writeln!(out, "{}", to_json(&event)?).map_err(|e| format!("Failed to write: {e}"))?;
    }
    log::debug!("classified {} notifications", notifications.len());
    Ok(())
}

fn cmd_status(code: &str) -> Result<(), String> {
    let status = StatusFlags::from_raw(parse_code(code)?);
    let behavior = classify_cookie_status(status);

    println!("Cookie category: {}", to_json(&behavior)?);
    println!("Blocking:        {}", is_blocking(status, false, false));
    Ok(())
}

fn cmd_prefs(overrides: Option<&str>) -> Result<(), String> {
    let mut settings = Settings::new(taxonomy()?);

    if let Some(path) = overrides {
        let content = read_input(path)?;
        let overrides: SettingsOverrides = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid overrides in '{path}': {e}"))?;
        settings
            .apply_overrides(&overrides)
            .map_err(|e| format!("Rejected overrides in '{path}': {e}"))?;
    }

    let json = serde_json::to_string_pretty(&settings.to_prefs())
        .map_err(|e| format!("Failed to serialize: {e}"))?;
    println!("{json}");
    Ok(())
}
