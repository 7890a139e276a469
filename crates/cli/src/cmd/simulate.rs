use std::path::PathBuf;

use clap::Parser;
use rand::Rng;
use ustream_cli_runner::CliContext;
use ustream_core::{CustomProcessor, Keccak256Hasher, TxContext};
use ustream_primitives::ParserStatus;
use ustream_token::TokenRecognizer;

use crate::config::CliConfig;

/// Feeds a raw transaction through the streaming parser, optionally chopped into adversarially
/// small fragments, and prints what the device would show.
#[derive(Debug, Parser)]
#[clap(about = "Parse a raw transaction and print its recovered fields.")]
pub struct SimulateCommand {
    /// Hex-encoded raw transaction, with or without a `0x` prefix.
    #[arg(value_name = "TX")]
    tx: String,

    /// Path to a JSON device configuration. Uses built-in defaults if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Decode using Ethereum field order instead of Celo's (which carries feeCurrency,
    /// gatewayTo, gatewayFee between startGas and to).
    #[arg(long)]
    ethereum: bool,

    /// Deliver the input in fragments of this many bytes instead of all at once.
    #[arg(long, value_name = "BYTES")]
    fragment_size: Option<usize>,

    /// Deliver the input in randomly sized fragments (1 to 8 bytes) — exercises the parser's
    /// suspend/resume handling the way a hardware transport's chunking would.
    #[arg(long, conflicts_with = "fragment_size")]
    random_fragments: bool,
}

impl SimulateCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let bytes = hex::decode(self.tx.trim_start_matches("0x"))
            .map_err(|e| eyre::eyre!("invalid hex transaction: {e}"))?;

        let config = match &self.config {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        let recognizer = TokenRecognizer::new(config.processor.clone());
        let mut parser: TxContext<Keccak256Hasher> = TxContext::new(
            Keccak256Hasher::new(),
            self.ethereum,
            Some(Box::new(recognizer)),
        );

        let fragments = chunk(&bytes, self.fragment_size, self.random_fragments);

        let mut status = ParserStatus::Processing;
        for piece in &fragments {
            status = parser.process_tx(piece)?;
            while status == ParserStatus::Suspended {
                status = parser.continue_tx()?;
            }
            if status == ParserStatus::Finished {
                break;
            }
        }

        match status {
            ParserStatus::Finished => {
                let token_context = parser.take_custom_processor().and_then(|processor| {
                    processor
                        .as_any()
                        .downcast_ref::<TokenRecognizer>()
                        .map(|recognizer| recognizer.token_context())
                });
                let content = parser.content.clone();
                let digest = parser.finalize_hash();

                let summary = ustream_host::summarize(
                    &content,
                    token_context.as_ref(),
                    &config.native_ticker,
                    config.native_decimals,
                    |addr| {
                        config
                            .processor
                            .tokens
                            .lookup(addr)
                            .map(|t| (t.ticker.as_str(), t.decimals))
                    },
                );

                println!("status: finished");
                println!("recipient: {}", summary.recipient);
                println!("amount: {} {}", summary.amount, summary.ticker);
                println!("max fee: {} {}", summary.max_fee, summary.fee_ticker);
                println!("hash: 0x{}", hex::encode(digest));
            }
            ParserStatus::Processing => {
                eyre::bail!("input ended before the transaction was fully parsed (truncated?)");
            }
            ParserStatus::Suspended => {
                unreachable!("suspensions are resolved inside the fragment loop")
            }
        }

        Ok(())
    }
}

/// Splits `bytes` into delivery fragments: one fixed size if given, random 1-8 byte pieces if
/// requested, or the whole buffer in one piece otherwise.
fn chunk(bytes: &[u8], fragment_size: Option<usize>, random: bool) -> Vec<Vec<u8>> {
    if random {
        let mut rng = rand::thread_rng();
        let mut out = Vec::new();
        let mut pos = 0;
        while pos < bytes.len() {
            let n = rng.gen_range(1..=8).min(bytes.len() - pos);
            out.push(bytes[pos..pos + n].to_vec());
            pos += n;
        }
        return out;
    }
    match fragment_size {
        Some(n) if n > 0 => bytes.chunks(n).map(|c| c.to_vec()).collect(),
        _ => vec![bytes.to_vec()],
    }
}
