// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod classify;
pub mod config;
pub mod counters;
pub mod error;
pub mod history;
pub mod logging;
pub mod rate;
pub mod runtime;
pub mod session;
pub mod store;
pub mod tally;
pub mod terminal;
pub mod timer;
pub mod ui;

pub use classify::{classify, Category, KeyStroke};
pub use counters::CounterState;
pub use tally::KeyTally;
