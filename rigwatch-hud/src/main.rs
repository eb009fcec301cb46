use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use rigwatch_core::{BridgeConfig, IngestionBridge, TelemetryTable, UiStore};
use rigwatch_hud::feed::{self, FeedHandle};
use rigwatch_hud::{events, ui, App, Settings};

#[derive(Parser, Debug)]
#[command(name = "rigwatch")]
#[command(about = "Terminal heads-up display for live rig telemetry")]
struct Args {
    /// Connect to a TCP endpoint streaming NDJSON feed events (host:port)
    #[arg(short, long, conflicts_with = "replay")]
    connect: Option<String>,

    /// Replay a capture file of NDJSON feed events
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Cadence between replayed lines, in milliseconds
    #[arg(long, default_value = "100", requires = "replay")]
    cadence: u64,

    /// Path to a settings file (defaults to ./rigwatch.toml when present)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Override the alert queue bound
    #[arg(long)]
    max_alerts: Option<usize>,

    /// Write tracing output to this file (the terminal belongs to the HUD)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.settings.as_deref())?;
    if let Some(max_alerts) = args.max_alerts {
        settings.max_alerts = max_alerts;
    }

    init_tracing(args.log_file.as_deref())?;

    // Wire the two stores and the bridge between them.
    let table = Arc::new(TelemetryTable::new(settings.default_rigs()));
    let store = Arc::new(UiStore::with_max_alerts(settings.max_alerts));
    let bridge = Arc::new(IngestionBridge::with_config(
        table.clone(),
        store.clone(),
        BridgeConfig {
            warn_score: settings.warn_score,
            critical_score: settings.critical_score,
        },
    ));

    // The TUI loop stays on the main thread; feeds and readers run on the
    // runtime in the background.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let feed_handle: Option<FeedHandle> = if let Some(addr) = &args.connect {
        Some(runtime.block_on(feed::connect_tcp(addr, bridge.clone()))?)
    } else {
        args.replay.as_ref().map(|path| {
            feed::spawn_replay(
                path.clone(),
                Duration::from_millis(args.cadence),
                bridge.clone(),
            )
        })
    };

    let app = App::new(
        store,
        table,
        settings.thresholds,
        Duration::from_millis(settings.summary_interval_ms),
        Duration::from_millis(settings.detail_interval_ms),
    );

    let result = run_tui(app);

    if let Some(handle) = feed_handle {
        handle.abort();
    }

    result
}

/// Set up tracing to a log file; a TUI owns stdout, so no file means no
/// subscriber.
fn init_tracing(log_file: Option<&std::path::Path>) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Set up the terminal, run the render loop, and restore on the way out.
fn run_tui(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal even on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.tick();

        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(event) = events::poll_event(Duration::from_millis(50))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Redrawn on the next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}
