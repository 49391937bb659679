mod config;
mod source;
mod state;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Cli, Config, TranscriptSource};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notify::{Config as WatchConfig, RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::OpenOptions,
    io,
    path::Path,
    sync::{
        mpsc::{self, Receiver},
        Mutex,
    },
    time::{Duration, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::from_cli(Cli::parse());
    init_logging(&config);
    info!(source = %config.source.label(), max_lines = config.max_lines, "starting transcript viewer");

    let mut app = state::App::new(&config);
    match &config.source {
        TranscriptSource::File(_) => app.refresh(true),
        TranscriptSource::Stdin => {
            let transcript = source::load_reader(io::stdin().lock())
                .context("Failed to read transcript from stdin")?;
            app.apply_transcript(transcript);
        }
    }

    let (watcher, watch_rx) = match &config.source {
        TranscriptSource::File(path) => setup_watcher(path),
        TranscriptSource::Stdin => (None, None),
    };
    let mut terminal = setup_terminal().context("Failed to set up terminal")?;
    let result = run_app(&mut terminal, &mut app, watch_rx);
    restore_terminal(&mut terminal)?;
    drop(watcher);

    if let Err(err) = result {
        eprintln!("aoc-transcript-view: {err}");
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Some(path) = &config.log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
                return;
            }
            Err(err) => {
                eprintln!("aoc-transcript-view: cannot open log file {}: {err}", path.display());
            }
        }
    }
    if config::log_stdout_enabled() {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .try_init();
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut state::App,
    watch_rx: Option<Receiver<()>>,
) -> Result<()> {
    let tick_rate = if watch_rx.is_some() {
        Duration::from_secs(2)
    } else {
        Duration::from_millis(500)
    };
    let input_poll = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(input_poll)? {
            match event::read()? {
                Event::Key(key) => {
                    if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                        app.handle_key(key);
                    }
                }
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse);
                }
                _ => {}
            }
        }

        if let Some(rx) = &watch_rx {
            let mut changed = false;
            while rx.try_recv().is_ok() {
                changed = true;
            }
            if changed {
                app.on_watch_event();
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// Watches the transcript's parent directory; writers that replace the file
/// atomically still trigger a reload.
fn setup_watcher(path: &Path) -> (Option<RecommendedWatcher>, Option<Receiver<()>>) {
    let (tx, rx) = mpsc::sync_channel(1);
    let mut watcher = match RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            if res.is_ok() {
                let _ = tx.try_send(());
            }
        },
        WatchConfig::default(),
    ) {
        Ok(watcher) => watcher,
        Err(err) => {
            warn!(error = %err, "file watcher unavailable, polling only");
            return (None, None);
        }
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if let Err(err) = watcher.watch(dir, RecursiveMode::NonRecursive) {
        warn!(error = %err, dir = %dir.display(), "failed to watch transcript directory");
        return (None, None);
    }

    (Some(watcher), Some(rx))
}
