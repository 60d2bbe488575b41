use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use navkeep::config::NavkeepConfig;
use navkeep::logging::init_tracing;
use navkeep::script::{run_script, Script};

mod cli;

use crate::cli::{Cli, Command, ConfigArgs, ReplayArgs};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Replay(args) => replay(&args),
        Command::Config(args) => print_config(&args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<NavkeepConfig> {
    let config = match path {
        Some(path) => NavkeepConfig::load_from(path),
        None => NavkeepConfig::load(),
    };
    config.context("Failed to load configuration")
}

fn replay(args: &ReplayArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(max_rewrites) = args.max_rewrites {
        if max_rewrites == 0 {
            bail!("--max-rewrites must be at least 1");
        }
        config.navigation.max_rewrites = max_rewrites;
    }
    init_tracing(&config.logging);

    let script = Script::load(&args.script)?;
    tracing::info!(
        script = %args.script.display(),
        steps = script.steps.len(),
        interceptors = script.interceptors.len(),
        "Replaying script"
    );
    let report = run_script(&script, &config.navigation)
        .with_context(|| format!("Replay of '{}' aborted", args.script.display()))?;

    println!("root: {}", script.root);
    for step in &report.steps {
        println!("{step}");
    }
    if !report.root_pops.is_empty() {
        println!("root pops: {}", report.root_pops.len());
    }
    println!("final: [{}]", report.final_back_stack.join(", "));
    Ok(())
}

fn print_config(args: &ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let rendered = config.to_toml().context("Failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}
