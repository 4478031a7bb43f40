mod action;
mod app;
mod input;
mod logging;
mod theme;
mod view;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use tokio_util::sync::CancellationToken;

use scholarscope_core::config_file::{self, Settings};
use scholarscope_core::store::{self, FileSlotStore, MemorySlotStore, SlotStore};
use scholarscope_core::{
    CoreError, HistoryStore, HttpAnalysisClient, ReportController, ReportSnapshotCache,
};

use crate::action::Action;
use crate::app::{App, Screen};
use crate::theme::Theme;

#[derive(Parser, Debug)]
#[command(
    name = "scholarscope",
    version,
    about = "Bibliometric reports for Google Scholar profiles"
)]
struct Args {
    /// Google Scholar profile URL to analyse on launch
    profile: Option<String>,

    /// Base URL of the analysis service
    #[arg(long)]
    service_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Don't rank venues against the CS/AI venue lists
    #[arg(long)]
    no_cs_ai: bool,

    /// Color theme (default, mono)
    #[arg(long)]
    theme: Option<String>,

    /// Directory holding saved history
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Session identity used to restore the last report
    #[arg(long)]
    session: Option<String>,

    /// Forget the restored report and start clean
    #[arg(long)]
    new_session: bool,

    /// Write the resolved settings to the config file and exit
    #[arg(long)]
    save_config: bool,
}

/// Defaults < config file < environment < CLI.
fn resolve_settings(args: &Args) -> Settings {
    let mut settings = Settings::default();
    settings.apply_file(&config_file::load_config());

    if let Ok(url) = std::env::var("SCHOLARSCOPE_API_URL")
        && !url.trim().is_empty()
    {
        settings.base_url = url;
    }
    if let Ok(id) = std::env::var("SCHOLARSCOPE_SESSION")
        && !id.trim().is_empty()
    {
        settings.session_id = Some(id);
    }

    if let Some(ref url) = args.service_url {
        settings.base_url = url.clone();
    }
    if let Some(secs) = args.timeout {
        settings.timeout = Duration::from_secs(secs.max(1));
    }
    if args.no_cs_ai {
        settings.is_cs_ai = false;
    }
    if let Some(ref theme) = args.theme {
        settings.theme_name = theme.clone();
    }
    if let Some(ref dir) = args.data_dir {
        settings.data_dir = Some(dir.clone());
    }
    if let Some(ref id) = args.session {
        settings.session_id = Some(id.clone());
    }
    settings
}

/// Open a file-backed slot store, falling back to memory so the UI still runs
/// on a read-only or directory-less system.
fn open_store(dir: Result<PathBuf, CoreError>, name: &str) -> Arc<dyn SlotStore> {
    match dir.and_then(FileSlotStore::open) {
        Ok(store) => {
            tracing::info!(store = name, dir = %store.dir().display(), "opened store");
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!(store = name, error = %e, "using in-memory store");
            Arc::new(MemorySlotStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Before settings, so config-file warnings are captured
    let _log_guard = match logging::default_log_dir().map(|dir| logging::init(&dir)) {
        Some(Ok(guard)) => Some(guard),
        Some(Err(e)) => {
            eprintln!("Warning: file logging disabled: {e}");
            None
        }
        None => None,
    };
    let settings = resolve_settings(&args);

    if args.save_config {
        let path =
            config_file::save_config(&settings.to_config_file()).map_err(anyhow::Error::msg)?;
        println!("Saved config to {}", path.display());
        return Ok(());
    }

    let data_dir = settings
        .data_dir
        .clone()
        .map(Ok)
        .unwrap_or_else(store::default_data_dir);
    let history = HistoryStore::new(open_store(data_dir, "history"));

    let session_id = settings
        .session_id
        .clone()
        .unwrap_or_else(store::default_session_id);
    if let Ok(root) = store::sessions_root() {
        match store::prune_sessions(&root, &session_id, store::session_is_live) {
            Ok(0) => {}
            Ok(n) => tracing::info!(removed = n, "pruned stale sessions"),
            Err(e) => tracing::warn!(error = %e, "could not prune sessions"),
        }
    }
    let snapshot = ReportSnapshotCache::new(open_store(store::session_dir(&session_id), "session"));
    if args.new_session {
        snapshot.clear();
    }

    let client = HttpAnalysisClient::new(&settings.base_url)
        .with_timeout(settings.timeout)
        .with_cs_ai(settings.is_cs_ai);
    tracing::info!(
        endpoint = %client.endpoint(),
        session = %session_id,
        is_cs_ai = settings.is_cs_ai,
        "starting"
    );
    let (controller, mut controller_rx) = ReportController::new(Arc::new(client), snapshot);

    let mut app = App::new(controller, history, Theme::from_name(&settings.theme_name));
    if app.report().is_some() {
        app.screen = Screen::Report;
    }
    if let Some(ref locator) = args.profile {
        app.screen = Screen::Report;
        app.locator_input = locator.trim().to_string();
        app.controller.submit(locator);
    }

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        original_hook(panic_info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    let tick_rate = Duration::from_millis(1000 / u64::from(settings.fps.max(1)));

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            Some(controller_event) = controller_rx.recv() => {
                app.handle_controller_event(controller_event);
                // Drain whatever else queued up since the last frame
                while let Ok(evt) = controller_rx.try_recv() {
                    app.handle_controller_event(evt);
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    for action in input::paste_actions(&evt, &app.input_mode) {
                        app.update(action);
                    }
                }
            } => {}
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
        }

        app.update(Action::Tick);

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    tracing::info!("exiting");

    Ok(())
}
