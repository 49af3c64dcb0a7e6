// src/main.rs
mod cli;
mod logging;
mod version;

use clap::Parser;
use cli::Args;
use crossterm::execute;
use retrofeed::config::{Config, paths::resolve_config_path};
use retrofeed::display::TimedWriter;
use retrofeed::error::AppError;
use retrofeed::fetch::create_http_client_with_timeout;
use retrofeed::scheduler::PlaylistScheduler;
use retrofeed::segments::SegmentRegistry;
use std::io::stdout;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    if args.version {
        version::print_version_info();
        return Ok(());
    }

    let config_path = resolve_config_path(args.config.as_deref());
    if !config_path.exists() {
        println!("Config file not found: {}", config_path.display());
        return Ok(());
    }

    let mut config = Config::load_from_path(&config_path).await?;
    if args.fast {
        config.apply_fast_mode();
    }

    // Keep the guard alive for the whole run so buffered log lines are flushed
    let (log_file_path, _guard) =
        logging::setup_logging(&args, config.log_file_path.as_deref()).await?;
    tracing::info!("Logs are being written to: {log_file_path}");
    tracing::info!(
        "Starting feed from {} with {} playlist entries",
        config_path.display(),
        config.playlist.order.len()
    );

    execute!(stdout(), crossterm::terminal::SetTitle("RETROFEED"))?;

    let mut out = TimedWriter::stdout(config.display.clone());
    if config.display.show_intros {
        version::show_title(&mut out).await;
    }

    let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
    let registry = SegmentRegistry::build(&config, &client, &mut out).await?;

    out.newline().await;
    out.newline().await;

    let mut scheduler = PlaylistScheduler::new(
        out,
        registry,
        config.playlist.order.clone(),
        config.playlist.segment_pause(),
    )?;
    scheduler.run().await;
    Ok(())
}
