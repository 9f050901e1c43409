//! CLI administration tool for qr-render.
//!
//! Provides cache maintenance and offline rendering without going through
//! the HTTP API. Uses the same environment configuration as the server.
//!
//! # Usage
//!
//! ```bash
//! # Evict every cached QR image
//! cargo run --bin admin -- cache clear qr
//!
//! # Check the configured cache backend
//! cargo run --bin admin -- cache health
//!
//! # Render a QR code to a file
//! cargo run --bin admin -- render https://s.example.com/abc --size 512 --format svg -o abc.svg
//!
//! # Print a data URL instead
//! cargo run --bin admin -- render https://s.example.com/abc --data-url
//! ```
//!
//! # Features
//!
//! - **Cache Maintenance**: Namespace-wide eviction and backend health
//! - **Rendering**: Same resolution, caching, and logo rules as `GET /qr`
//! - **Interactive Prompts**: Confirmation before destructive operations
//! - **Colored Output**: Terminal-friendly formatting using `colored` crate

use qr_render::config::{self, Config};
use qr_render::domain::cache_key::CacheNamespace;
use qr_render::domain::style_resolver::RawRenderOptions;
use qr_render::server::build_qr_service;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::path::PathBuf;

/// CLI tool for managing qr-render.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Cache maintenance
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Render a QR code locally
    Render(RenderArgs),
}

/// Cache maintenance subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Evict every entry in a namespace (qr, device)
    Clear {
        namespace: CacheNamespace,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check the configured cache backend
    Health,
}

/// Options for the `render` command. Style flags mirror the `/qr` query
/// parameters; omitted flags use the configured defaults.
#[derive(Args)]
struct RenderArgs {
    /// Text to encode, usually a short link
    url: String,

    #[arg(long)]
    size: Option<i64>,

    /// Foreground color (hex)
    #[arg(long)]
    color: Option<String>,

    /// Background color (hex)
    #[arg(long)]
    bg: Option<String>,

    /// Finder pattern color (hex), defaults to the foreground
    #[arg(long)]
    eye_color: Option<String>,

    /// png or svg
    #[arg(long)]
    format: Option<String>,

    #[arg(long)]
    margin: Option<i64>,

    /// square, dots or rounded
    #[arg(long)]
    module_style: Option<String>,

    /// square, rounded or leaf
    #[arg(long)]
    eye_style: Option<String>,

    /// Logo asset reference (PNG only)
    #[arg(long)]
    logo: Option<String>,

    /// Logo size as a percentage of the image width
    #[arg(long)]
    logo_size: Option<i64>,

    /// Output file (defaults to qr.<format>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a data URL to stdout instead of writing a file
    #[arg(long)]
    data_url: bool,
}

impl RenderArgs {
    fn options(&self) -> RawRenderOptions {
        RawRenderOptions {
            size: self.size,
            color: self.color.clone(),
            bg: self.bg.clone(),
            eye_color: self.eye_color.clone(),
            format: self.format.clone(),
            margin: self.margin,
            module_style: self.module_style.clone(),
            eye_style: self.eye_style.clone(),
            logo: self.logo.clone(),
            logo_size: self.logo_size,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Cache { action } => handle_cache_action(action, &config).await?,
        Commands::Render(args) => handle_render(args, &config).await?,
    }

    Ok(())
}

/// Dispatches cache maintenance commands.
async fn handle_cache_action(action: CacheAction, config: &Config) -> Result<()> {
    let service = build_qr_service(config).await;

    match action {
        CacheAction::Clear { namespace, yes } => {
            println!("{}", "🧹 Clear Cache".bright_blue().bold());
            println!();
            println!("  Backend:   {}", service.cache().backend_name().cyan());
            println!("  Namespace: {}", namespace.as_str().cyan());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Evict every '{}' entry?", namespace))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let removed = service
                .clear_cache(namespace)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to clear cache: {}", e))?;

            println!(
                "{} {} entries removed",
                "✅".green(),
                removed.to_string().bright_white().bold()
            );
        }
        CacheAction::Health => {
            let backend = service.cache().backend_name();
            println!(
                "{}",
                format!("🔍 Checking {} cache backend...", backend).bright_blue()
            );

            if service.cache().health_check().await {
                println!("{}", "✅ Cache backend OK".green().bold());
            } else {
                anyhow::bail!("{} cache backend is unavailable", backend);
            }
        }
    }

    Ok(())
}

/// Renders one QR code and writes it to disk or stdout.
async fn handle_render(args: RenderArgs, config: &Config) -> Result<()> {
    let service = build_qr_service(config).await;
    let options = args.options();

    if args.data_url {
        let data_url = service
            .generate_data_url(&args.url, &options)
            .await
            .context("Failed to render QR code")?;
        println!("{}", data_url);
        return Ok(());
    }

    let req = service.resolve(&args.url, &options);
    let payload = service
        .generate_request(&req)
        .await
        .context("Failed to render QR code")?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("qr.{}", req.format.as_str())));

    tokio::fs::write(&output, &payload)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} Wrote {} ({}px {}, {} bytes)",
        "✅".green(),
        output.display().to_string().cyan(),
        req.size,
        req.format.as_str(),
        payload.len()
    );

    Ok(())
}
