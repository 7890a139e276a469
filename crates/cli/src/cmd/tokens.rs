use clap::Parser;
use std::path::PathBuf;
use ustream_cli_runner::CliContext;

use crate::config::CliConfig;

/// Lists the tokens a given device configuration would recognize.
#[derive(Debug, Parser)]
#[clap(about = "List the tokens a device configuration recognizes.")]
pub struct TokensCommand {
    /// Path to a JSON device configuration. Uses built-in defaults (no known tokens) if omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl TokensCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let config = match self.config {
            Some(path) => CliConfig::load(&path)?,
            None => CliConfig::default(),
        };

        println!(
            "native coin: {} ({} decimals)",
            config.native_ticker, config.native_decimals
        );
        println!(
            "data field policy: {}",
            if config.processor.data_allowed {
                "allowed"
            } else {
                "rejected"
            }
        );
        println!(
            "contract details: {}",
            if config.processor.contract_details {
                "shown"
            } else {
                "hidden"
            }
        );

        let mut any = false;
        for token in config.processor.tokens.iter() {
            any = true;
            println!(
                "0x{} {} ({} decimals)",
                hex::encode(token.address),
                token.ticker,
                token.decimals
            );
        }
        if !any {
            println!("(no known tokens)");
        }

        Ok(())
    }
}
