//! spark-folio - browse a portfolio export in the terminal.
//!
//! ```text
//! spark-folio --data portfolio.json
//! FOLIO_DATA=portfolio.json FOLIO_LOG=debug spark-folio --log-file folio.log
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use spark_folio::input::{self, InputEvent};
use spark_folio::render::{DiffRenderer, TerminalSession};
use spark_folio::{
    open_external, scheduler, Action, App, Config, Context, FileFeed, MemoryStore, Result,
};

#[derive(Parser)]
#[command(name = "spark-folio", version, about = "Terminal portfolio viewer")]
struct Cli {
    /// Realtime-database JSON export to display. Re-read when it changes.
    #[arg(short, long, env = "FOLIO_DATA")]
    data: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Route to open first, e.g. /posts or /post/<id>
    #[arg(short, long)]
    route: Option<String>,

    /// How long to wait for data before showing empty pages
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Write logs here (filter with FOLIO_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn settings(cli: Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(data) = cli.data {
        config.data_file = Some(data);
    }
    if let Some(route) = cli.route {
        config.start_route = route;
    }
    if let Some(ms) = cli.timeout_ms {
        config.loading_timeout_ms = ms;
    }
    if let Some(log_file) = cli.log_file {
        config.log_file = Some(log_file);
    }
    config.validate()?;
    Ok(config)
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    // stdout belongs to the UI; without a file there is nowhere to log.
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn run(config: Config) -> Result<()> {
    let store = MemoryStore::new();
    let mut feed = FileFeed::new(config.data_path()?, store.clone(), config.reload_interval());
    // Fail before taking the terminal if the file is unusable.
    feed.reload()?;

    let cx = Context::new(Rc::new(store.clone())).with_timeout(config.loading_timeout());
    let start = config.start_route()?;
    let tick = config.tick();

    let mut session = TerminalSession::enter()?;
    let (width, height) = session.size()?;
    let mut app = App::new(cx, start, width, height);
    let mut renderer = DiffRenderer::new();
    info!(route = %app.route(), width, height, "started");

    let mut last = Instant::now();
    loop {
        let now = Instant::now();
        let elapsed = now - last;
        last = now;

        feed.poll(elapsed);
        store.flush();
        scheduler::advance(elapsed);

        match input::poll_event(tick)? {
            Some(InputEvent::Key(key)) => match app.handle_key(key) {
                Action::Quit => break,
                Action::Open(url) => {
                    if let Err(err) = open_external(&url) {
                        warn!(%url, %err, "could not open link");
                    }
                }
                Action::None => {}
            },
            Some(InputEvent::Resize(width, height)) => {
                app.resize(width, height);
                renderer.invalidate();
            }
            None => {}
        }

        if app.is_dirty() {
            let frame = app.frame()?;
            renderer.render(session.out(), &frame)?;
        }
    }

    info!("quit");
    Ok(())
}

fn main() -> ExitCode {
    let config = match settings(Cli::parse()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("spark-folio: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging(config.log_file.as_deref()) {
        eprintln!("spark-folio: cannot open log file: {err}");
        return ExitCode::FAILURE;
    }

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "fatal");
            eprintln!("spark-folio: {err}");
            ExitCode::FAILURE
        }
    }
}
