use crate::cli::{Cli, Command};

pub(crate) fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.cmd {
        Command::Validate { kind, path } => {
            crate::commands::validate::cmd_validate(kind, &path, cli.json)
        }
        Command::Inspect { kind, limit, path } => {
            crate::commands::inspect::cmd_inspect(kind, &path, limit, cli.json)
        }
    }
}
