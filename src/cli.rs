use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::page_range::SpecFormat;

#[derive(Parser)]
#[command(name = "pdfsplice")]
#[command(about = "Extract, split, and concatenate PDF pages")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract pages into a new PDF
    #[command(alias = "cat")]
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Pages to extract (e.g., "1-5", "1,3,5", "1-3,7,10-12")
        pages: String,

        /// Page specification grammar
        #[arg(short, long, value_enum, default_value_t = SpecFormat::Mixed)]
        format: SpecFormat,

        /// Output file [default: <input>_extracted.pdf next to the input]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write each selected page to its own PDF
    #[command(alias = "burst")]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Pages to split out [default: all pages]
        pages: Option<String>,

        /// Page specification grammar
        #[arg(short, long, value_enum, default_value_t = SpecFormat::Mixed)]
        format: SpecFormat,

        /// Output directory [default: the input's directory]
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,

        /// Prefix for output files [default: input file stem]
        #[arg(short, long)]
        base_name: Option<String>,

        /// Keep writing remaining pages after a page fails
        #[arg(long)]
        keep_going: bool,
    },

    /// Concatenate PDFs into one, skipping unusable files
    #[command(alias = "merge")]
    Concat {
        /// PDF files in output order
        #[arg(required_unless_present = "folder", conflicts_with = "folder")]
        inputs: Vec<PathBuf>,

        /// Use every PDF in this folder, in alphabetical order
        #[arg(long)]
        folder: Option<PathBuf>,

        /// Output file [default: concatenated_files.pdf or concatenated_folder_pdfs.pdf]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check whether files are readable PDFs with at least one page
    Validate {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Display PDF metadata
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Menu-driven prompts for all operations
    Interactive,

    /// Run as MCP server
    Mcp,
}
