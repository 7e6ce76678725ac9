use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mariadb_monitor::config::LogSettings;
use mariadb_monitor::{
    App, DashboardRenderer, MySqlStatsSource, Sampler, Settings, TerminalInput, Theme,
};

#[derive(Parser, Debug)]
#[command(name = "mariadb-monitor", version)]
#[command(about = "Live terminal dashboard for MariaDB connections and PHP-FPM workers")]
struct Args {
    /// Settings file (TOML); ./mariadb-monitor.toml is used when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file (overrides log.file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Take one sample, print it as JSON and exit
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(path) = args.log_file {
        settings.log.file = Some(path);
    }
    init_logging(&settings.log)?;

    let stats = MySqlStatsSource::new(settings.connection());
    let workers = settings.worker_counter()?;
    let mut sampler = Sampler::new(Box::new(stats), Box::new(workers));

    if args.once {
        let snapshot = sampler.sample();
        println!("{}", serde_json::to_string_pretty(&snapshot.to_json())?);
        return Ok(());
    }

    let renderer = DashboardRenderer::new(
        Theme::from_mode(settings.display.theme),
        settings.display.locale,
        settings.workers.capacity,
    );
    run_tui(App::new(sampler, renderer))
}

/// Log to the configured file, or not at all.
///
/// The dashboard owns the terminal, so nothing may go to stdout or stderr.
fn init_logging(log: &LogSettings) -> Result<()> {
    let Some(path) = &log.file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log.level)
            .with_context(|| format!("invalid log level {:?}", log.level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

/// Run the dashboard on the real terminal
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("failed to enter alternate screen");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e).context("failed to initialize terminal");
        }
    };

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Run the main loop
    let result = app.run(&mut terminal, &mut TerminalInput);

    // Release the database connection before handing the terminal back
    drop(app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("terminal restored");
    result
}
