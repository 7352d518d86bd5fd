//! nomadex - export NOMAD Oasis sample metadata with author attribution
//!
//! Queries sample entries from a NOMAD Oasis, resolves author ids to
//! display names, and writes joined CSV/JSON artifacts for downstream
//! plotting.

use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;
mod progress;

use config::Config;

#[derive(Parser)]
#[command(name = "nomadex")]
#[command(about = "Export NOMAD Oasis sample metadata with author attribution")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file path (default: ./nomadex.toml or ~/.config/nomadex/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Query samples, resolve authors, and write export artifacts
    Fetch(cmd::fetch::FetchArgs),
    /// Verify credentials and show the authenticated user
    Whoami,
    /// Show current configuration
    Config,
}

fn init_logging(quiet: bool, debug: bool) {
    let default_level = if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{:<5}] {}", record.level(), record.args()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.debug);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Fetch(args) => cmd::fetch::run(args, &config),
        Command::Whoami => cmd::whoami::run(&config),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec!["Base URL", &config.api.resolved_base_url()?]);
            table.add_row(vec![
                "Oasis",
                config.api.oasis.as_deref().unwrap_or("(default)"),
            ]);
            table.add_row(vec!["Section type", &config.query.section_type]);
            table.add_row(vec!["Page size", &config.query.page_size.to_string()]);
            table.add_row(vec![
                "Output directory",
                &config.output.dir.display().to_string(),
            ]);
            table.add_row(vec![
                "Credentials",
                match nomadex_api::Credentials::from_env() {
                    Some(nomadex_api::Credentials::Token(_)) => "access token",
                    Some(nomadex_api::Credentials::Basic { .. }) => "username/password",
                    None => "not set",
                },
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
