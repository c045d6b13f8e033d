//! emx-mdscript CLI
//!
//! Extract the shell blocks of a Markdown file into a runnable script.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "emx-mdscript")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(about = "Extract shell code blocks from a Markdown file into a shell script")]
struct Cli {
    /// Markdown file to read
    input: PathBuf,

    /// Shell script to write (created or overwritten)
    output: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let stats = emx_mdscript::extract(&cli.input, &cli.output)
        .run()
        .with_context(|| format!("failed to extract {}", cli.input.display()))?;
    log::debug!("{}", stats.summary());
    Ok(())
}
