use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    time::{Duration, Instant},
};

use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::tty::IsTty;

use keytally::{
    app::{Action, App},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{AppEvent, CrosstermEventSource, Runner},
    store::{CounterStore, MemoryCounterStore, SqliteCounterStore},
    terminal::TerminalGuard,
    ui, Category, KeyTally,
};

/// count every key you press and watch your keys-per-second
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal keystroke counter: tallies letters, numbers, function keys and everything else, and charts your keys-per-second over active typing time."
)]
pub struct Cli {
    /// counter database to use instead of the per-user default
    #[clap(long)]
    db: Option<PathBuf>,

    /// keep counts in memory only; nothing is read or written
    #[clap(long)]
    no_persist: bool,

    /// clear stored counts before starting
    #[clap(long)]
    reset: bool,

    /// alternate config file
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// log level for the log file (off, error, warn, info, debug, trace)
    #[clap(long)]
    log_level: Option<String>,

    /// print the stored counts and exit
    #[clap(long)]
    print: bool,
}

impl Cli {
    fn load_config(&self) -> Config {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path).load(),
            None => FileConfigStore::new().load(),
        }
    }

    fn open_store(&self, config: &Config) -> keytally::error::Result<Box<dyn CounterStore>> {
        if self.no_persist || !config.persist {
            log::info!("persistence disabled, counting in memory");
            return Ok(Box::new(MemoryCounterStore::new()));
        }
        let path = self
            .db
            .clone()
            .or_else(|| config.db_path.clone())
            .unwrap_or_else(SqliteCounterStore::default_path);
        Ok(Box::new(SqliteCounterStore::open(path)?))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = cli.load_config();

    let level = logging::resolve_level(
        cli.log_level.as_deref(),
        std::env::var(logging::LOG_ENV).ok().as_deref(),
        config.log_level.as_deref(),
    );
    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init(level, &path) {
            eprintln!("keytally: logging to {} disabled: {e}", path.display());
        }
    }

    let mut store = cli.open_store(&config)?;
    if cli.reset {
        store.clear_counters()?;
        log::info!("stored counts cleared from the command line");
    }

    if cli.print {
        print_counts(store.as_ref())?;
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(KeyTally::new(store), config.show_chart);
    log::info!("starting ui");
    run_tui(&mut app, Duration::from_millis(config.tick_rate_ms.max(1)))?;
    log::info!(
        "exiting with {} keypresses counted",
        app.tally.counters().total()
    );

    Ok(())
}

fn print_counts(store: &dyn CounterStore) -> io::Result<()> {
    let counters = store.load_counters();
    let mut out = io::stdout().lock();
    writeln!(out, "{:<14}{}", "Total", counters.total())?;
    for category in Category::ALL {
        writeln!(out, "{:<14}{}", category.label(), counters.get(category))?;
    }
    Ok(())
}

fn run_tui(app: &mut App, tick: Duration) -> Result<(), Box<dyn Error>> {
    let mut guard = TerminalGuard::acquire()?;
    let runner = Runner::new(CrosstermEventSource::new(), tick);

    guard.terminal().draw(|f| ui::draw(app, f))?;

    loop {
        let redraw = match runner.step() {
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize => true,
            AppEvent::Key(key) => {
                if app.handle_key(&key, Instant::now(), Local::now()) == Action::Quit {
                    break;
                }
                true
            }
        };

        if redraw {
            guard.terminal().draw(|f| ui::draw(app, f))?;
        }
    }

    Ok(())
}
