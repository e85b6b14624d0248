mod cli;
mod commands;
mod engine;
mod error;
mod mcp;
mod page_range;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "pdfsplice=warn",
        1 => "pdfsplice=info",
        _ => "pdfsplice=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries results and the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json = cli.json;

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path, json)?;
        }
        Commands::Validate { paths } => {
            commands::validate::run(&paths, json)?;
        }
        Commands::Extract {
            path,
            pages,
            format,
            output,
        } => {
            commands::extract::run(&path, &pages, format, output, json)?;
        }
        Commands::Split {
            path,
            pages,
            format,
            output_dir,
            base_name,
            keep_going,
        } => {
            let options = commands::split::SplitOptions {
                pages,
                format,
                output_dir,
                base_name,
                keep_going,
            };
            commands::split::run(&path, options, json)?;
        }
        Commands::Concat {
            inputs,
            folder,
            output,
        } => {
            commands::concat::run(inputs, folder, output, json)?;
        }
        Commands::Interactive => {
            commands::interactive::run()?;
        }
    }

    Ok(())
}
