//! Loading a [`ProcessorConfig`] and chain display defaults from a JSON file (mirrors
//! `load_from_json_file`/`parse_json` in the teacher's CLI utilities, minus the file-system
//! ceremony this tool doesn't need).

use std::path::Path;

use serde::Deserialize;
use ustream_primitives::{ProcessorConfig, TokenInfo, TokenTable};

#[derive(Debug, Deserialize)]
struct TokenEntry {
    address: String,
    ticker: String,
    decimals: u8,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    data_allowed: bool,
    contract_details: bool,
    native_ticker: String,
    native_decimals: u8,
    tokens: Vec<TokenEntry>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            data_allowed: true,
            contract_details: true,
            native_ticker: "CELO".to_string(),
            native_decimals: 18,
            tokens: Vec::new(),
        }
    }
}

/// A loaded (or default) device configuration: the recognizer policy plus the chain's native
/// coin display defaults.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub processor: ProcessorConfig,
    pub native_ticker: String,
    pub native_decimals: u8,
}

impl Default for CliConfig {
    fn default() -> Self {
        let raw = RawConfig::default();
        Self {
            processor: ProcessorConfig {
                data_allowed: raw.data_allowed,
                contract_details: raw.contract_details,
                tokens: TokenTable::new(Vec::new()),
            },
            native_ticker: raw.native_ticker,
            native_decimals: raw.native_decimals,
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
        let raw: RawConfig = serde_json::from_str(&text)
            .map_err(|e| eyre::eyre!("failed to parse {}: {e}", path.display()))?;

        let mut tokens = Vec::with_capacity(raw.tokens.len());
        for entry in &raw.tokens {
            let bytes = hex::decode(entry.address.trim_start_matches("0x"))
                .map_err(|e| eyre::eyre!("invalid token address {}: {e}", entry.address))?;
            let address: [u8; 20] = bytes
                .try_into()
                .map_err(|_| eyre::eyre!("token address {} is not 20 bytes", entry.address))?;
            tokens.push(TokenInfo {
                address,
                ticker: entry.ticker.clone(),
                decimals: entry.decimals,
            });
        }

        Ok(Self {
            processor: ProcessorConfig {
                data_allowed: raw.data_allowed,
                contract_details: raw.contract_details,
                tokens: TokenTable::new(tokens),
            },
            native_ticker: raw.native_ticker,
            native_decimals: raw.native_decimals,
        })
    }
}
