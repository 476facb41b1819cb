mod commands;
mod runner;

pub use commands::parse_script;
pub use runner::Runner;
