//! File-backed logging on top of `env_logger`.
//!
//! stdout and stderr belong to the terminal UI while it runs, so log records go
//! to `keytally.log` under the state directory. The level is picked from the
//! command line, then `KEYTALLY_LOG`, then the config file, defaulting to
//! `warn`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::error::Result;

pub const LOG_ENV: &str = "KEYTALLY_LOG";

/// Resolve the effective level. Unknown names fall through to the next source.
pub fn resolve_level(cli: Option<&str>, env: Option<&str>, config: Option<&str>) -> LevelFilter {
    [cli, env, config]
        .into_iter()
        .flatten()
        .find_map(|s| LevelFilter::from_str(s.trim()).ok())
        .unwrap_or(LevelFilter::Warn)
}

fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    // module directives from the env still apply, the resolved level is the default
    builder.parse_env(LOG_ENV).filter_level(level).format(|buf, record| {
        writeln!(
            buf,
            "[{}] [{:<5}] [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder
}

/// Install the file logger. `LevelFilter::Off` skips opening the file.
pub fn init(level: LevelFilter, path: &Path) -> Result<()> {
    if level == LevelFilter::Off {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // a logger installed earlier stays in charge
    if builder(level)
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .is_err()
    {
        log::debug!("logger already installed, keeping it");
    }
    Ok(())
}
