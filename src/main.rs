use anyhow::Result;
use git_toolbox::cli::{self, Cli};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return Ok(cli::usage_failure(err)),
    };
    cli::init_tracing(cli.common.verbose);
    cli.execute()
}
