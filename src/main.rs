//! Main entry point for the tvmaze-browser CLI application.

use clap::Parser;
use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info, warn};
use ratatui::prelude::*;
use std::fs::{self, OpenOptions};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tvmaze_browser::api::TvMazeClient;
use tvmaze_browser::config::Config;
use tvmaze_browser::gateway::{Gateway, GatewayEvent};
use tvmaze_browser::tui::{draw, poll_event, Action, App};

/// Command-line arguments for the tvmaze-browser application.
#[derive(Parser, Debug)]
#[command(
    name = "tvmaze-browser",
    version,
    about = "Browse TV shows and episodes from TVMaze",
    long_about = "Browse, filter and pick TV shows and their episodes from the TVMaze API using a TUI interface."
)]
struct Args {
    /// Catalog endpoint (overrides config)
    #[arg(long)]
    shows_url: Option<String>,

    /// Episodes endpoint template containing {id} (overrides config)
    #[arg(long)]
    episodes_url: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Log verbosity level: 0=error, 1=warn, 2=info, 3=debug, 4=trace
    #[arg(short, long, default_value_t = 1)]
    log: u8,

    /// File to write logs to (defaults to the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the merged configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

/// Route log output to a file so it does not tear the TUI.
///
/// Runs before the terminal enters the alternate screen, so problems opening
/// the file are reported on stderr and logging is discarded.
fn init_logging(level: log::LevelFilter, log_file: Option<PathBuf>) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false);

    match open_log_file(log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("Warning: could not open log file: {}. Logging disabled.", e);
            builder.target(env_logger::Target::Pipe(Box::new(io::sink())));
        }
    }

    builder.init();
}

fn open_log_file(log_file: Option<PathBuf>) -> io::Result<fs::File> {
    let path = match log_file {
        Some(path) => path,
        None => Config::get_log_path()?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(&path)
}

/// Initialize the terminal for TUI rendering.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match args.log {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    init_logging(log_level, args.log_file.clone());
    debug!("Log level set to {:?}", log_level);

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config: {}. Using defaults.", e);
        Config::new()
    });

    // Merge config with CLI args
    if let Some(url) = args.shows_url {
        config.shows_url = url;
    }
    if let Some(url) = args.episodes_url {
        config.episodes_url = url;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    if args.write_config {
        if let Err(e) = config.validate() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        let path = config.save()?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    let client = match TvMazeClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    info!("Using catalog {}", config.shows_url);

    let (gateway, mut events) = Gateway::new(client);
    let mut app = App::new(config.keybindings.clone());

    let mut terminal = init_terminal()?;

    gateway.fetch_show_list();
    let result = run_app(&mut terminal, &mut app, &gateway, &mut events).await;

    restore_terminal()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    gateway: &Gateway<TvMazeClient>,
    events: &mut mpsc::UnboundedReceiver<GatewayEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Apply finished requests before drawing
        while let Ok(event) = events.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|f| draw(f, app))?;

        if let Some(Event::Key(key)) = poll_event(Duration::from_millis(100))? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.handle_input(key) {
                Action::Quit => break,
                Action::FetchEpisodes(ticket) => gateway.fetch_episode_list(ticket),
                Action::None => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
