use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wearwatch::ui::{self, Theme};
use wearwatch::{
    events, Dashboard, DerivedSeries, ExportDocument, FileHistorySource, HistorySource,
    PollLoop, Settings, HISTORY_LIMIT,
};

#[derive(Parser, Debug)]
#[command(name = "wearwatch")]
#[command(about = "Terminal dashboard for predictive-maintenance history")]
struct Args {
    /// Base URL of the prediction service (overrides the config file)
    #[arg(short = 'u', long, conflicts_with = "file")]
    endpoint: Option<String>,

    /// Replay a saved /history response instead of polling the service
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Config file (TOML) with endpoint, connect_timeout, request_timeout and log_file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file (filter with WEARWATCH_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch one window, export it to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(ref endpoint) = args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if args.log_file.is_some() {
        settings.log_file = args.log_file.clone();
    }

    init_logging(settings.log_file.as_deref())?;

    let source = build_source(args.file.as_deref(), &settings)?;
    let rt = tokio::runtime::Runtime::new()?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return rt.block_on(export_once(source, export_path));
    }

    // The poll loop spawns onto the runtime; the TUI stays on this thread
    let _guard = rt.enter();
    let poll = PollLoop::start(source.clone());
    let app = Dashboard::new(source.description()).with_poll_loop(poll);

    info!(source = source.description(), "starting dashboard");
    run_tui(app)
}

/// Pick the history source from the CLI and settings.
fn build_source(file: Option<&Path>, settings: &Settings) -> Result<Arc<dyn HistorySource>> {
    if let Some(path) = file {
        return Ok(Arc::new(FileHistorySource::new(path)));
    }

    Ok(Arc::new(settings.http_source()?))
}

/// Install a file-backed log subscriber. The terminal belongs to the TUI.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let filter = EnvFilter::try_from_env("WEARWATCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))
}

/// Fetch a single window and write it as JSON.
async fn export_once(source: Arc<dyn HistorySource>, export_path: &Path) -> Result<()> {
    let records = source.fetch_history(HISTORY_LIMIT).await?;
    let series = DerivedSeries::from_records(&records);

    ExportDocument::new(source.description(), &series).write_to(export_path)?;

    println!(
        "Exported {} records to: {}",
        series.len(),
        export_path.display()
    );
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(app: Dashboard) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = app.with_theme(Theme::auto_detect());

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut Dashboard) -> Result<()> {
    while app.running {
        // Apply any ticks that finished since the last frame
        app.reload_data();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                // Terminal will redraw on next iteration
                _ => {}
            }
        }
    }

    Ok(())
}
