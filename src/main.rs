//! studytrack: Study tracking JSON API
//!
//! Usage:
//!   studytrack serve                 Start the API server
//!   studytrack serve --port 8080     Start the API server on a given port
//!   studytrack serve --in-memory     Start with a throwaway in-memory store
//!   studytrack status                Show row counts of the store

mod server;

use std::env;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use studytrack::cli::status_command;
use studytrack::config::Config;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    match args[1].as_str() {
        "serve" => {
            setup_logging();
            let mut config = Config::from_env()?;

            // Check for --port flag
            if let Some(port) = args
                .iter()
                .position(|a| a == "--port")
                .and_then(|i| args.get(i + 1))
            {
                config.port = port
                    .parse()
                    .with_context(|| format!("Invalid port: {}", port))?;
            }
            if args.iter().any(|a| a == "--in-memory") {
                config.in_memory = true;
            }

            server::start_http(config)?;
        }
        "status" => {
            let config = Config::from_env()?;
            status_command(&config)?;
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "--version" | "-V" | "version" => {
            print_version();
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
        }
    }

    Ok(())
}

fn print_usage() {
    println!(
        r#"studytrack: Study tracking JSON API

USAGE:
    studytrack <COMMAND> [OPTIONS]

COMMANDS:
    serve                  Start the API server
    serve --port <PORT>    Start the API server on a given port
    serve --in-memory      Start with an in-memory store
    status                 Show row counts of the store
    help                   Show this help message

ENVIRONMENT:
    STUDYTRACK_PORT        Port to listen on (default: 3000)
    STUDYTRACK_BIND        Address to bind (default: 127.0.0.1)
    STUDYTRACK_DB          SQLite database path (default: studytrack.db)
    STUDYTRACK_IN_MEMORY   Set to 1 for an in-memory store
    STUDYTRACK_UPLOADS     Upload directory (default: uploads)
    STUDYTRACK_LESSONS     JSON file with the lesson catalog
    RUST_LOG               Log filter (default: info)
"#
    );
}

fn print_version() {
    println!("studytrack {}", env!("CARGO_PKG_VERSION"));
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
