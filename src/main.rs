use anyhow::Result;
use clap::Parser;

use flexdock::cli::{run, CliArgs};

fn main() -> Result<()> {
    flexdock::tracing::init();

    let args = CliArgs::parse();
    let stdout = std::io::stdout();
    run(args, &mut stdout.lock())
}
