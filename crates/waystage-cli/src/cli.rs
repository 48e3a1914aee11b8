use clap::{Parser, Subcommand};
use waystage_format::FileKind;

#[derive(Parser)]
#[command(
    name = "waystage",
    version,
    about = "Inspect and validate intermediate graph-extraction artifacts.",
    long_about = "Inspect and validate intermediate graph-extraction artifacts.\n\nFile kinds:\n  node-mapping       fingerprinted node-based to edge-based id mapping\n  datasources        datasource name blob\n  segment-data       per-segment weights, durations and datasource tags\n  turn-restrictions  fingerprinted conditional turn restrictions"
)]
pub(crate) struct Cli {
    /// Emit machine-readable JSON instead of human output.
    #[arg(long, global = true)]
    pub(crate) json: bool,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub(crate) verbose: u8,

    #[command(subcommand)]
    pub(crate) cmd: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fully decode a file and report whether it is well-formed.
    Validate {
        /// File kind: node-mapping, datasources, segment-data or turn-restrictions.
        #[arg(long)]
        kind: FileKind,
        /// File to validate.
        path: String,
    },
    /// Decode a file and print a summary of its contents.
    Inspect {
        /// File kind: node-mapping, datasources, segment-data or turn-restrictions.
        #[arg(long)]
        kind: FileKind,
        /// Number of leading records to print.
        #[arg(long, default_value_t = 5)]
        limit: usize,
        /// File to inspect.
        path: String,
    },
}
