mod args;
mod changes;
mod config;
mod console;
mod draft;
mod editor;
mod error;
mod gemini;
mod git;
mod pipeline;
mod prompt;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use console::TerminalConsole;
use gemini::GeminiClient;
use git::GitRepo;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "commitsmith=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = config::load().context("Failed to load config")?;
    let api_key = config::api_key()?;
    let repo = GitRepo::discover()?;

    let client = GeminiClient::new(
        api_key,
        config.model(args.model.as_deref()),
        config.request_timeout_secs(),
    );
    debug!(model = client.model(), "using model");

    let mut console = TerminalConsole::stdin();
    let outcome = pipeline::run_pipeline(&repo, &client, &mut console, &args)?;
    debug!(?outcome, "done");
    Ok(())
}
