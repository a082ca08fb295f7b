//! # ImageCypher Binary Entry Point
//!
//! Thin wrapper that loads the configuration, sets up logging and runs the
//! interactive menu.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin imagecypher
//! cargo run --bin imagecypher -- --config config/imagecypher.toml --verbose
//! ```
//!
//! Exit status is 0 on success or an invalid menu choice, 1 on any error.

use clap::Parser;
use log::LevelFilter;
use std::io;

// Import from the library crate
use image_cypher::cli::run_menu;
use image_cypher::common::config::CypherConfig;
use image_cypher::cypher::ImageCypher;
use image_cypher::utils::logging::init_logger;

/// Command-line arguments for the imagecypher binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (TOML format)
    ///
    /// Example: config/imagecypher.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration, falling back to defaults when no file is given
    let config = match &args.config {
        Some(path) => CypherConfig::from_file(path)?,
        None => CypherConfig::default(),
    };

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        config.log_level()
    };
    init_logger(level);

    let cypher = ImageCypher::from_config(&config);

    let outcome = {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut input = stdin.lock();
        let mut output = stdout.lock();
        run_menu(&cypher, &mut input, &mut output)
    };

    std::process::exit(outcome.exit_code());
}
