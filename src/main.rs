mod app;
mod cache;
mod catalog;
mod commands;
mod config;
mod db;
mod deals;
mod event;
mod logging;
mod query;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use deals::api_types::NewDeal;
use deals::cached_client::{CachedDealsClient, LoadMode};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sharkdeck")]
#[command(about = "A terminal browser for Shark Tank deals, inspired by k9s")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/sharkdeck/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Deals API base URL (overrides the config file and SHARKDECK_API_URL)
  #[arg(long)]
  api_url: Option<String>,

  /// Ignore a still-valid local snapshot and reload from the API
  #[arg(long)]
  refresh: bool,

  /// Run without the local snapshot cache
  #[arg(long)]
  no_cache: bool,

  #[command(subcommand)]
  command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
  /// Browse deals in the terminal (default)
  Browse,
  /// Create a deal from a JSON file ("-" reads stdin)
  Add {
    file: String,
    /// Print the record that would be stored instead of sending it
    #[arg(long)]
    dry_run: bool,
  },
  /// Delete the local snapshot
  ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let mut config = config::Config::load(args.config.as_deref(), args.api_url)?;
  if args.no_cache {
    config.cache.enabled = false;
  }

  // Dropping the guard flushes buffered log lines
  let _guard = logging::init(&config.log_level)?;
  info!(api = %config.api.url, "starting sharkdeck");

  let client = CachedDealsClient::new(&config)?;

  match args.command.unwrap_or(Cmd::Browse) {
    Cmd::Browse => {
      let mode = if args.refresh {
        LoadMode::Refresh
      } else {
        LoadMode::CacheFirst
      };
      let mut app = app::App::new(&config, client, mode);
      app.run().await?;
    }
    Cmd::Add { file, dry_run } => {
      let deal: NewDeal = serde_json::from_str(&read_input(&file)?)
        .map_err(|e| eyre!("Invalid deal JSON in {}: {}", file, e))?;
      // Reject ids that would not read back before printing or sending
      deal.deal_id()?;
      if dry_run {
        println!("{}", serde_json::to_string_pretty(&deal.into_item()?)?);
        return Ok(());
      }
      let created = client.create_deal(&deal).await?;
      println!("{}", created.id);
    }
    Cmd::ClearCache => {
      client.clear_cache()?;
      println!("Local snapshot cleared");
    }
  }

  Ok(())
}

fn read_input(file: &str) -> Result<String> {
  if file == "-" {
    let mut buf = String::new();
    std::io::stdin()
      .read_to_string(&mut buf)
      .map_err(|e| eyre!("Failed to read stdin: {}", e))?;
    return Ok(buf);
  }
  std::fs::read_to_string(file).map_err(|e| eyre!("Failed to read {}: {}", file, e))
}
