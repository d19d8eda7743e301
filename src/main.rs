mod app;
mod config;
mod open_url;
mod ui;
mod util;

use anyhow::Result;
use console::Term;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they stay out of the menus
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let mut config_override: Option<String> = None;
    let mut api_override: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_override = args.next(),
            "--api" => api_override = args.next(),
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            _ => {}
        }
    }

    let cfg = config::load(config_override, api_override)?;
    let _ = Term::stdout().clear_screen();

    let mut app = app::App::start(cfg).await?;
    app.run().await
}

fn print_help() {
    println!("snooze");
    println!("Usage: snooze [--config <path>] [--api <url>]");
    println!("  --config <path>  Path to a config.toml");
    println!("  --api <url>      Base URL of the story API");
    println!("Set RUST_LOG=debug to log API requests to stderr.");
}
