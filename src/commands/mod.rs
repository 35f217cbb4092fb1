use clap::{Parser, Subcommand};
use anyhow::Result;
use std::path::PathBuf;

use crate::core::exporter::{FORMATS, MarkdownExporter};
use crate::logging::init_logging;

pub mod export;
pub mod schema;

#[derive(Parser)]
#[command(name = "apidiff-md")]
#[command(about = "Render assembly API diffs as colored Markdown reports")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export a diff document (or a directory of them) to a report
    Export {
        /// Diff XML file, or a directory searched for *.xml files
        input: PathBuf,

        /// Directory the reports are written to
        #[arg(long = "out-dir", short = 'o', default_value = ".")]
        out_dir: PathBuf,

        /// Report format
        #[arg(long = "format", short = 'f', default_value = MarkdownExporter::FORMAT)]
        format: String,

        /// JSON config file (defaults to ./apidiff.json when present)
        #[arg(long = "config")]
        config: Option<PathBuf>,

        /// Option preset (default, plain)
        #[arg(long = "preset")]
        preset: Option<String>,

        /// Additional type name to leave out of the report
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// Assembly name used for the report title and file name
        #[arg(long = "assembly-name")]
        assembly_name: Option<String>,
    },
    /// Generate the JSON schema of the json export
    Schema {
        #[arg(long = "out-dir", short = 'o', default_value = "schemas")]
        out_dir: PathBuf,
    },
    /// List available report formats
    Formats,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Export {
            input,
            out_dir,
            format,
            config,
            preset,
            exclude,
            assembly_name,
        } => {
            export::export_diffs(export::ExportArgs {
                input,
                out_dir,
                format,
                config,
                preset,
                exclude,
                assembly_name,
            })?;
        }
        Commands::Schema { out_dir } => {
            schema::generate_schemas(&out_dir)?;
        }
        Commands::Formats => {
            for format in FORMATS {
                println!("{}", format);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_defaults() {
        let cli = Cli::try_parse_from(["apidiff-md", "export", "diff.xml"]).unwrap();
        match cli.command {
            Commands::Export { out_dir, format, exclude, .. } => {
                assert_eq!(out_dir, PathBuf::from("."));
                assert_eq!(format, "markdown+");
                assert!(exclude.is_empty());
            }
            _ => panic!("Expected export"),
        }
    }
}
