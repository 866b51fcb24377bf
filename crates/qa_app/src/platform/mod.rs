pub mod cli;
pub mod config;

mod app;
mod effects;
mod logging;
mod ui;

pub use app::run_app;
