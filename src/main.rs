#![forbid(unsafe_code)]

mod blocks;
mod config;
mod constants;
mod controller;
mod legend;
mod settings;
mod state;
mod store;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level as TraceLevel, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use controller::{Activation, BarView, InteractionController};
use settings::Settings;
use state::{ProgressState, Transition};
use store::{JsonStore, MemoryStore, ProgressStore};

/// Interactive daily progress bars for markdown documents
#[derive(Debug, Parser)]
#[command(name = "daybar", version, about)]
struct Args {
    /// Markdown document containing progress-bar blocks
    document: PathBuf,

    /// Progress store file (defaults to the platform data dir)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Settings file (defaults to the platform config dir)
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .unwrap_or_else(|e| {
        warn!(error = %e, "Settings unusable, falling back to defaults");
        Settings::default()
    });

    // The startup sweep must finish before any bar seeds from the store.
    // A store that cannot even be pruned is unusable; degrade to memory so
    // the bars still work for this session.
    let store_path = args.store.clone().unwrap_or_else(JsonStore::default_path);
    let json_store = JsonStore::new(store_path);
    let today = Local::now().date_naive();
    let store: Arc<dyn ProgressStore> = match store::prune_stale(&json_store, today) {
        Ok(removed) => {
            info!(path = %json_store.path().display(), removed = removed, "Progress store ready");
            Arc::new(json_store)
        }
        Err(e) => {
            error!(path = %json_store.path().display(), error = %e, "Progress store unusable, progress will not survive this session");
            Arc::new(MemoryStore::new())
        }
    };

    let document = std::fs::read_to_string(&args.document)
        .with_context(|| format!("Failed to read document {:?}", args.document))?;
    let document_path = args.document.to_string_lossy().to_string();

    let found = blocks::extract(&document);
    if found.is_empty() {
        warn!(document = %document_path, "No progress-bar blocks found");
        return Ok(());
    }
    info!(count = found.len(), document = %document_path, "Found progress-bar blocks");

    let mut bars: Vec<InteractionController> = found
        .iter()
        .map(|block| {
            let config = config::parse(&block.source, &settings);
            debug!(
                line = block.line,
                name = %config.name,
                initial = config.initial_progress,
                color = %config.color,
                background = %config.background_color,
                width = %config.width,
                height = %config.height,
                font = %config.legend_font_size,
                duration = %config.transition_duration,
                animation = ?config.animation_mode(),
                "Parsed bar style"
            );
            let state = ProgressState::initialize(config, &document_path, Arc::clone(&store));
            InteractionController::new(state)
        })
        .collect();

    list_bars(&bars, &settings);
    run_loop(&mut bars, &settings)
}

/// Interactive loop: `click N`, `reset N`, `list`, `quit`
fn run_loop(bars: &mut [InteractionController], settings: &Settings) -> Result<()> {
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(()); // EOF
        }

        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("click"), Some(idx)) => {
                if let Some(bar) = lookup(bars, idx) {
                    if let Some(update) = bar.handle(Activation::Primary, settings) {
                        if update.transition == Transition::Wrapped {
                            println!("  wrapped around");
                        }
                        println!("{}", render_bar(bar, &update.view));
                    }
                }
            }
            (Some("reset"), Some(idx)) => {
                if let Some(bar) = lookup(bars, idx) {
                    match bar.handle(Activation::Secondary, settings) {
                        Some(update) => println!("{}", render_bar(bar, &update.view)),
                        None => println!("  reset is disabled in settings"),
                    }
                }
            }
            (Some("list"), _) => list_bars(bars, settings),
            (Some("quit"), _) | (Some("q"), _) => return Ok(()),
            (None, _) => {}
            (Some(other), _) => {
                println!("  unknown command '{other}' (try: click N, reset N, list, quit)");
            }
        }
    }
}

fn lookup<'a>(
    bars: &'a mut [InteractionController],
    idx: &str,
) -> Option<&'a mut InteractionController> {
    let parsed = match idx.parse::<usize>() {
        Ok(n) if n >= 1 && n <= bars.len() => n,
        _ => {
            println!("  expected a bar number between 1 and {}", bars.len());
            return None;
        }
    };
    bars.get_mut(parsed - 1)
}

fn list_bars(bars: &[InteractionController], settings: &Settings) {
    for (i, bar) in bars.iter().enumerate() {
        let view = bar.snapshot(settings);
        println!("{}. {}", i + 1, render_bar(bar, &view));
    }
}

/// Textual gauge, standing in for the styled element a richer host would draw
fn render_bar(bar: &InteractionController, view: &BarView) -> String {
    let width = constants::gauge::WIDTH;
    let filled = ((view.fraction * width as f64).round() as usize).min(width);

    let mut out = format!(
        "{} [{}{}] {}/{}",
        bar.state().config.name,
        "#".repeat(filled),
        "-".repeat(width - filled),
        view.progress,
        view.total,
    );
    if let Some(legend) = &view.legend {
        out.push_str("  ");
        out.push_str(legend);
    }
    if bar.state().is_degraded() {
        out.push_str("  (not saved)");
    }
    out
}
