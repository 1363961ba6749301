use std::env::var;
use std::io::stderr;
use std::process::ExitCode;

use clap::Parser;
use eyre::Result as EyreResult;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{registry, EnvFilter};

mod cli;
mod config;
mod output;

use cli::RootCommand;

#[tokio::main]
async fn main() -> EyreResult<ExitCode> {
    color_eyre::install()?;

    let invocation = RootCommand::parse().resolve().await?;

    setup(invocation.options.verbose)?;

    invocation.run().await
}

fn setup(verbose: bool) -> EyreResult<()> {
    let directives = match var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => value,
        _ if verbose => "kivik_test=debug,kivik_=debug".to_owned(),
        _ => "kivik_test=info,kivik_=info".to_owned(),
    };

    registry()
        .with(EnvFilter::builder().parse(directives)?)
        .with(layer().with_writer(stderr))
        .init();

    Ok(())
}
