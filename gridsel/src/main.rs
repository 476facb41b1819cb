mod app;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io::{self, Read};
use std::path::PathBuf;

/// Run a grid selection script and print the resulting selection
///
/// Examples:
///   gridsel drag.txt                   # Run a script file
///   gridsel < drag.txt                 # Read the script from stdin
///   gridsel --config grid.toml drag.txt
#[derive(Parser, Debug)]
#[command(name = "gridsel", version, about)]
struct Args {
    /// Configuration file, `gridsel/config.toml` in the user config directory when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Script to run, read from stdin when omitted
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Load configuration
    let config = gridsel_core::Config::load(args.config)?;
    info!("Loaded configuration: {:?}", config);

    let script = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => {
            let mut script = String::new();
            io::stdin().read_to_string(&mut script)?;
            script
        }
    };
    let commands = app::parse_script(&script)?;
    info!("Running {} commands", commands.len());

    let mut runner = app::Runner::new(&config);
    let stdout = io::stdout();
    runner.run(&commands, &mut stdout.lock())?;

    Ok(())
}
