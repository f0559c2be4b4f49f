//! CLI administration tool for linkstamp.
//!
//! Inspects links, click statistics and the database without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all links, newest first
//! cargo run --bin admin -- links list
//!
//! # Show one link with its click history
//! cargo run --bin admin -- links show test01
//!
//! # View totals
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST` / `DB_PORT` / `DB_USER` / `DB_PASSWORD` / `DB_NAME`

use linkstamp::application::services::StatsService;
use linkstamp::config::{Config, mask_connection_string};
use linkstamp::domain::entities::ShortLink;
use linkstamp::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for inspecting linkstamp.
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
    /// Inspect links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// List all links
    List,

    /// Show a link and its clicks
    Show {
        /// Short code
        code: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::Links { action } => handle_links_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &database_url).await?,
    }

    Ok(())
}

async fn handle_links_action(action: LinksAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = StatsService::new(repo);

    match action {
        LinksAction::List => {
            let links = service
                .list_all()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;
            list_links(&links);
        }
        LinksAction::Show { code } => {
            let link = service
                .get_stats(&code)
                .await
                .map_err(|e| anyhow::anyhow!("{}: {}", code, e))?;
            show_link(&link);
        }
    }

    Ok(())
}

/// Prints links as a table.
///
/// # Output Format
///
/// ```text
/// 🔗 Links
///
///   Code        Created            Expires            Clicks  Target
///   ─────────────────────────────────────────────────────────────────────────
///   test01      2026-01-01 10:30   2026-01-01 11:00   3       https://example.com
/// ```
fn list_links(links: &[ShortLink]) {
    println!("{}", "🔗 Links".bright_blue().bold());
    println!();

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return;
    }

    println!(
        "  {:<11} {:<18} {:<18} {:<7} {}",
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "Expires".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    let now = Utc::now();
    for link in links {
        let expires = link.expires_at.format("%Y-%m-%d %H:%M").to_string();
        let expires = if link.is_expired_at(now) {
            expires.red()
        } else {
            expires.green()
        };

        println!(
            "  {:<11} {:<18} {:<18} {:<7} {}",
            link.code.cyan(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            expires,
            link.click_count,
            link.target_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();
}

fn show_link(link: &ShortLink) {
    println!("{}", format!("🔗 {}", link.code).bright_blue().bold());
    println!();
    println!("  Target:  {}", link.target_url.cyan());
    println!("  Created: {}", link.created_at.to_rfc3339());

    let status = if link.is_expired() {
        "EXPIRED".red()
    } else {
        "ACTIVE".green()
    };
    println!("  Expires: {} {}", link.expires_at.to_rfc3339(), status);
    println!(
        "  Clicks:  {}",
        link.click_count.to_string().bright_green().bold()
    );

    if link.clicks.is_empty() {
        println!();
        return;
    }

    println!();
    for click in &link.clicks {
        println!(
            "  {}  {:<15} {:<24} {}",
            click
                .timestamp
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black(),
            click.ip_address.as_deref().unwrap_or("-"),
            click.location,
            click.referrer
        );
    }
    println!();
}

/// Displays totals across all links.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
        .fetch_one(pool)
        .await?;

    let active_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM short_links WHERE expires_at >= NOW()")
            .fetch_one(pool)
            .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:   {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Active:  {}",
        active_count.to_string().bright_green().bold()
    );
    println!(
        "  Expired: {}",
        (links_count - active_count).to_string().bright_black()
    );
    println!(
        "  Clicks:  {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool, database_url: &str) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  URL:        {}", mask_connection_string(database_url));
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
