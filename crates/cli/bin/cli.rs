use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use ustream::cmd::{simulate::SimulateCommand, tokens::TokensCommand};
use ustream::version::short_version;
use ustream_cli_runner::CliRunner;

#[derive(Debug, Parser)]
#[command(
    name = "ustream",
    about = "Streaming RLP transaction parser for the Celo secure element firmware.",
    version = short_version()
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Simulate(SimulateCommand),
    Tokens(TokensCommand),
}

impl Cli {
    pub fn run(self) -> eyre::Result<()> {
        init_tracing(self.debug);
        let runner = CliRunner::default();
        match self.command {
            Commands::Simulate(cmd) => runner.run_command_until_exit(|ctx| cmd.execute(ctx)),
            Commands::Tokens(cmd) => runner.run_command_until_exit(|ctx| cmd.execute(ctx)),
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
