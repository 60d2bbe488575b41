use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "navkeep",
    version,
    about = "Replay navigation scripts through an interceptor chain"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a TOML navigation script and print one line per step.
    Replay(ReplayArgs),

    /// Print the effective configuration as TOML.
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Path to the script file.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override `navigation.max_rewrites`.
    #[arg(long = "max-rewrites", value_name = "N")]
    pub max_rewrites: Option<usize>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
