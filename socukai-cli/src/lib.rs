pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::Cli;
pub use commands::run;
pub use config::Settings;
