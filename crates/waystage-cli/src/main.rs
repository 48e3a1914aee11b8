mod app;
mod cli;
mod commands;
mod types;

use clap::Parser;

/// Entry point for the `waystage` artifact inspection tool.
fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);
    app::run(cli)
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}
