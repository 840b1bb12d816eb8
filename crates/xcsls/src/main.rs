mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::bail;
use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.dev {
        init_logging();
        return commands::dev::run();
    }

    let root = cli.workspace.canonicalize_utf8().map_err(|err| {
        anyhow::anyhow!("invalid workspace {}: {err}", cli.workspace)
    })?;
    if !root.is_dir() {
        bail!("workspace {root} is not a directory");
    }

    if cli.lsp {
        // The server owns logging setup; stdout stays clean for the wire
        // protocol.
        return xcsls_server::run(root);
    }

    init_logging();
    let settings = xcsls_conf::Settings::new(&root).unwrap_or_default();
    let compiled = commands::build::run(&root, &settings)?;
    println!("compiled {compiled} file(s) under {root}");
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
