use clap::{error::ErrorKind, CommandFactory, Parser};
use codespeed::{
    app::{self, App},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

/// terminal coding speed test
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Load a source file, start the test and type it back. Time, words per minute and accuracy update live while typed characters are colored against the reference."
)]
pub struct Cli {
    /// file to load as the reference text (.txt, .js, .py, .java, .cpp, .html, .css by default)
    file: Option<PathBuf>,

    /// config file to use instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write diagnostic logs to this file (default location when no path is given)
    #[clap(long, num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    /// tick interval in milliseconds; each tick still counts as one second (test aid)
    #[clap(long, hide = true)]
    tick_ms: Option<u64>,

    /// write the default config file and exit
    #[clap(long)]
    init_config: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();

    if cli.init_config {
        store.save(&Default::default())?;
        println!("wrote {}", store.path().display());
        return Ok(());
    }

    let config = store.load_or_default();

    if let Some(log_file) = &cli.log_file {
        if let Some(path) = log_file.clone().or_else(AppDirs::log_path) {
            logging::init(&path, &config.log_filter).map_err(|e| e as Box<dyn Error>)?;
        }
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let ticker = match cli.tick_ms {
        Some(ms) => FixedTicker::new(Duration::from_millis(ms.max(1))),
        None => FixedTicker::every_second(),
    };
    let mut app = App::new(config);
    if let Some(path) = &cli.file {
        // failures are shown in the status line, the app still starts
        let _ = app.load_file(path);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runner = Runner::new(CrosstermEventSource::new(), ticker);
    let result = app::run(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}
