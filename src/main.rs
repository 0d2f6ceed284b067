use anyhow::Context;
use clap::Parser;
use threadstress::{benchmark::benchmark, command_parser::App};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let app = App::parse();

    let default_level = if app.global_opts.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    benchmark(app.strategy, &app.global_opts).context("benchmark aborted")?;

    Ok(())
}
