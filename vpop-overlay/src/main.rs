//! Overlay harness (vpop-overlay) - Main entry point
//!
//! Drives the overlay engine against an in-memory page. Commands are read
//! from stdin, one per line:
//!
//! - `select <text>`: pointer-up with `<text>` selected
//! - `ended <word>`: the popup showing `<word>` finished its video
//! - `close <word>`: the popup's close button was clicked
//! - `drag <word> <dx> <dy>`: drag the popup by a pointer delta
//! - `status`: list visible popups
//! - `quit`: detach and exit (also on end of input)

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use vpop_common::config::{resolve_config_path, CONFIG_ENV_VAR};
use vpop_common::events::OverlayEvent;
use vpop_overlay::config::{OverlayConfig, PositionMode};
use vpop_overlay::host::{HeadlessPage, Point};
use vpop_overlay::lookup::{AssetResolver, MediaMapping};
use vpop_overlay::{OverlayRuntime, PageEvent, PageEvents, PopupId};

const DEFAULT_LOG_LEVEL: &str = "info";

/// Command-line arguments for vpop-overlay
#[derive(Parser, Debug)]
#[command(name = "vpop-overlay")]
#[command(about = "Headless word-to-video popup overlay")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Media mapping JSON (word -> media path)
    #[arg(short, long, env = "VPOP_MAPPING")]
    mapping: Option<PathBuf>,

    /// Base for relative media paths
    #[arg(long)]
    asset_root: Option<String>,

    /// Popup placement: anchored, stacked-corner, single-permanent
    #[arg(long)]
    position: Option<PositionMode>,

    /// Keep popups after their video ends
    #[arg(long)]
    persistent: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing before config so load warnings are visible
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) = reload::Layer::new(
        env_filter.unwrap_or_else(|| EnvFilter::new(default_directives(DEFAULT_LOG_LEVEL))),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = resolve_config_path(args.config.as_deref(), CONFIG_ENV_VAR);
    let mut config =
        OverlayConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    if !from_env && config.logging.level != DEFAULT_LOG_LEVEL {
        filter_handle
            .reload(EnvFilter::new(default_directives(&config.logging.level)))
            .context("Failed to apply configured log level")?;
    }

    // Command-line overrides
    if let Some(mapping) = args.mapping {
        config.mapping_path = mapping;
    }
    if let Some(root) = args.asset_root {
        config.asset_root = root;
    }
    if let Some(position) = args.position {
        config.popup.position = position;
    }
    if let Some(persistent) = args.persistent {
        config.popup.persistent = persistent;
    }

    info!("Media mapping: {}", config.mapping_path.display());

    let lookup = Arc::new(MediaMapping::new(
        config.mapping_path.clone(),
        AssetResolver::new(config.asset_root.clone()),
    ));
    let (runtime, page) = OverlayRuntime::new(config.popup.clone(), HeadlessPage::new(), lookup);
    let mut events = runtime.manager().events().subscribe();
    let overlay = tokio::spawn(runtime.run());

    let mut popups: HashMap<String, Uuid> = HashMap::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else { break };
                if !dispatch(line.trim(), &page, &popups)? {
                    break;
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => track(&event, &mut popups),
                    Err(e) => warn!("Event stream lagged: {}", e),
                }
            }
        }
    }

    page.shutdown()?;
    let manager = overlay.await.context("Overlay runtime panicked")?;
    println!("{} popup(s) shown", manager.shown_total());
    Ok(())
}

/// Filter directives covering both workspace crates at `level`
fn default_directives(level: &str) -> String {
    format!("vpop_overlay={level},vpop_common={level}")
}

/// Apply one stdin command. Returns false on `quit`.
fn dispatch(line: &str, page: &PageEvents, popups: &HashMap<String, Uuid>) -> Result<bool> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let popup = |word: &str| popups.get(word.trim()).map(|id| PopupId::from(*id));

    match command {
        "" => {}
        "quit" | "exit" => return Ok(false),
        "select" => page.pointer_up(rest)?,
        "ended" => match popup(rest) {
            Some(id) => page.media_ended(id)?,
            None => println!("no popup for '{}'", rest.trim()),
        },
        "close" => match popup(rest) {
            Some(id) => page.close_clicked(id)?,
            None => println!("no popup for '{}'", rest.trim()),
        },
        "drag" => {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            let [word, dx, dy] = parts.as_slice() else {
                println!("usage: drag <word> <dx> <dy>");
                return Ok(true);
            };
            let (Ok(dx), Ok(dy)) = (dx.parse::<i32>(), dy.parse::<i32>()) else {
                println!("drag offsets must be integers");
                return Ok(true);
            };
            match popup(*word) {
                Some(id) => {
                    page.send(PageEvent::PopupPointerDown { id, at: Point::new(0, 0) })?;
                    page.send(PageEvent::PointerMove { at: Point::new(dx, dy) })?;
                    page.pointer_up("")?;
                }
                None => println!("no popup for '{}'", word),
            }
        }
        "status" => {
            let mut words: Vec<&String> = popups.keys().collect();
            words.sort();
            println!("{} visible: {:?}", words.len(), words);
        }
        other => println!("unknown command '{}'", other),
    }
    Ok(true)
}

/// Keep the word → popup map in sync and echo lifecycle events
fn track(event: &OverlayEvent, popups: &mut HashMap<String, Uuid>) {
    match event {
        OverlayEvent::PopupShown {
            popup_id,
            word,
            media_ref,
            top_offset,
            ..
        } => {
            println!("shown '{}' -> {} (offset {})", word, media_ref, top_offset);
            popups.insert(word.clone(), *popup_id);
        }
        OverlayEvent::PopupClosed {
            popup_id,
            word,
            reason,
            ..
        } => {
            println!("closed '{}' ({})", word, reason);
            if popups.get(word) == Some(popup_id) {
                popups.remove(word);
            }
        }
        OverlayEvent::SelectionDropped { word, reason, .. } => {
            println!("dropped '{}' ({})", word, reason);
        }
        OverlayEvent::EntryQueued { word, queue_len, .. } => {
            println!("queued '{}' (queue length {})", word, queue_len);
        }
        _ => {}
    }
}
