// Copyright 2026 Syllabo Contributors
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use syllabo::cli;
use syllabo::config::DEFAULT_OUTPUT_FILE;

#[derive(Parser)]
#[command(
    name = "syllabo",
    about = "Syllabo - course outline extractor for authenticated learning platforms",
    version,
    after_help = "Run 'syllabo <command> --help' for details on each command."
)]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the course structure of a package into a text report
    Extract {
        /// Package URL (e.g. "https://campus.example.com/app/pacote/123")
        url: String,
        /// Where to write the course structure report
        #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,
        /// Run the browser headless (needs a previously saved session)
        #[arg(long)]
        headless: bool,
    },
    /// Inspect or clear the saved login session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Check environment and diagnose issues
    Doctor,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Show details of the saved session, if any
    Show,
    /// Delete the saved session (forces manual login on the next run)
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.quiet {
        std::env::set_var("SYLLABO_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("SYLLABO_VERBOSE", "1");
    }
    if cli.no_color {
        std::env::set_var("SYLLABO_NO_COLOR", "1");
    }

    // Status updates already narrate the run on stderr, so logs stay at warn
    // unless --verbose or RUST_LOG asks for more.
    let directive = if cli.verbose {
        "syllabo=debug"
    } else {
        "syllabo=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Extract {
            url,
            output,
            headless,
        } => cli::extract_cmd::run(&url, output, headless).await,
        Commands::Session { action } => match action {
            SessionAction::Show => cli::session_cmd::run_show().await,
            SessionAction::Clear => cli::session_cmd::run_clear().await,
        },
        Commands::Doctor => cli::doctor::run().await,
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
