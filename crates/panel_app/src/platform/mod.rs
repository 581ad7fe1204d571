//! Terminal front end for the panel: CLI parsing, configuration, logging,
//! and the loop that feeds engine results back into the core.
mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod render;
mod session;
mod shell;

pub use app::run_app;
