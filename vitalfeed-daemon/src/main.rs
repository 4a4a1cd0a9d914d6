//! # vitalfeed-daemon
//!
//! The Vitalfeed presentation host.
//!
//! This daemon is responsible for:
//! - Loading the content catalog once at startup
//! - Refreshing the "updated X ago" labels on a fixed cadence
//! - Resolving each record's media slot (thumbnail, embedded player, direct video)
//! - Applying play clicks and thumbnail load failures, read as console commands
//!
//! ## Configuration
//!
//! The daemon reads configuration from `$XDG_CONFIG_HOME/vitalfeed/config.toml`,
//! creating a commented default file on first run.
//!
//! ## Running
//!
//! ```bash
//! # Start the daemon
//! cargo run --bin vitalfeed-daemon
//!
//! # With debug logging
//! RUST_LOG=debug cargo run --bin vitalfeed-daemon
//! ```

use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vitalfeed_core::media::Visual;
use vitalfeed_daemon::catalog;
use vitalfeed_daemon::clock::{ClockHandle, FreshnessClock, SystemClock};
use vitalfeed_daemon::command::{parse_command, Command, HELP};
use vitalfeed_daemon::config::{Config, ConfigOrigin};
use vitalfeed_daemon::feed::{Card, Feed};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so its log level can seed the filter
    let loaded = Config::load_default();
    let config = match &loaded {
        Ok((cfg, _)) => cfg.clone(),
        Err(_) => Config::default(),
    };

    // Initialize logging; RUST_LOG takes precedence over the config
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.daemon.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting vitalfeed-daemon v{}", env!("CARGO_PKG_VERSION"));
    match &loaded {
        Ok((_, ConfigOrigin::Created(path))) => {
            info!("Created default configuration file at: {}", path.display())
        }
        Ok((_, ConfigOrigin::Existing(path))) => {
            info!("Loaded configuration from {}", path.display())
        }
        Err(e) => warn!("Failed to load config, using defaults: {:#}", e),
    }

    let source = catalog::source_for(&config.catalog);
    let records = catalog::load_records(source.as_ref()).await?;
    let mut feed = Feed::new(records, config.media.clone())?;

    let clock = FreshnessClock::start(Arc::new(SystemClock), config.tick_interval());
    let mut ticks = clock.subscribe();

    print_feed(&feed.render(clock.now().await));
    info!("Daemon startup complete");
    info!("Type :help for commands, Ctrl+C to stop");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            tick = ticks.recv() => match tick {
                Ok(tick) => print_feed(&feed.render(tick.now)),
                Err(RecvError::Lagged(skipped)) => warn!("Skipped {} freshness tick(s)", skipped),
                Err(RecvError::Closed) => {
                    warn!("Freshness clock stopped unexpectedly");
                    break;
                }
            },
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => match parse_command(&line) {
                    Ok(command) => {
                        if !handle_command(&mut feed, &clock, command).await {
                            break;
                        }
                    }
                    Err(e) => warn!("{}", e),
                },
                None => {
                    info!("stdin closed; rendering on clock ticks only");
                    stdin_open = false;
                }
            },
            _ = &mut shutdown => {
                info!("Received Ctrl+C");
                break;
            }
        }
    }

    info!("Shutting down...");
    clock.shutdown().await;

    info!("Daemon stopped");
    Ok(())
}

/// Apply one console command. Returns `false` when the daemon should stop.
async fn handle_command(feed: &mut Feed, clock: &ClockHandle, command: Command) -> bool {
    match command {
        Command::Play { id } => match feed.play(&id) {
            Ok(Some(active)) => {
                info!("Now playing '{}'", active);
                print_feed(&feed.render(clock.now().await));
            }
            Ok(None) => {
                info!("Playback stopped");
                print_feed(&feed.render(clock.now().await));
            }
            Err(e) => warn!("{}", e),
        },
        Command::ThumbnailFailed { id } => match feed.thumbnail_failed(&id) {
            Ok(next) => println!("{} -> {}", id, next),
            Err(e) => warn!("{}", e),
        },
        Command::Stop => {
            if let Some(stopped) = feed.stop() {
                info!("Stopped '{}'", stopped);
            }
        }
        Command::Render => print_feed(&feed.render(clock.now().await)),
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}

fn print_feed(cards: &[Card]) {
    for card in cards {
        match &card.channel {
            Some(channel) => println!("[{}] {} ({})", card.id, card.title, channel),
            None => println!("[{}] {}", card.id, card.title),
        }

        let media = match &card.visual {
            Visual::Thumbnail(url) if card.playable => format!("thumbnail {} [play]", url),
            Visual::Thumbnail(url) => format!("thumbnail {}", url),
            Visual::ActivePlayer(url) => format!("playing {}", url),
            Visual::LegacyVideo(url) => format!("playing video {}", url),
        };
        println!("    updated {} | {}", card.age_label.to_lowercase(), media);

        if !card.tags.is_empty() {
            let tags: Vec<String> = card.tags.iter().map(|tag| format!("#{}", tag)).collect();
            println!("    {}", tags.join(" "));
        }
    }
    println!();
}
