//! pagelist CLI
//!
//! Runs list-block queries against a site's page index.

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

mod commands;
mod logging;
mod output;

#[derive(Debug, Parser)]
#[command(name = "pagelist", version)]
#[command(about = "Filter and sort CMS page indexes", long_about = None)]
struct Cli {
    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Filter, sort and page through an index
    Query(commands::query::QueryArgs),
    /// Print the index path for a page
    IndexPath(commands::site::IndexPathArgs),
    /// Print the language paths for a page
    Site(commands::site::SiteArgs),
    /// Print the typed configuration of a block
    BlockConfig(commands::block::BlockConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = match cli.command {
        Commands::Query(args) => commands::query::execute(args, &mut out),
        Commands::IndexPath(args) => commands::site::execute_index_path(args, &mut out),
        Commands::Site(args) => commands::site::execute_site(args, &mut out),
        Commands::BlockConfig(args) => commands::block::execute(args, &mut out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
