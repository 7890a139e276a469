/// A token the device recognizes by contract address, for display purposes only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub address: [u8; 20],
    pub ticker: String,
    pub decimals: u8,
}

/// Process-wide, read-only table of known tokens (§9: "initialize once at startup, never
/// mutate during a parse").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTable {
    tokens: Vec<TokenInfo>,
}

impl TokenTable {
    pub fn new(tokens: Vec<TokenInfo>) -> Self {
        Self { tokens }
    }

    /// Looks up a token by its contract address. Mirrors `getKnownToken` in the original
    /// firmware: a linear scan over a small, process-wide table.
    pub fn lookup(&self, address: &[u8]) -> Option<&TokenInfo> {
        self.tokens.iter().find(|t| t.address == address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenInfo> {
        self.tokens.iter()
    }
}

/// Read-only policy the custom processor consults while deciding how to handle the `data`
/// field (§6: "Persisted state consumed (read-only)").
#[derive(Debug, Clone, Default)]
pub struct ProcessorConfig {
    /// Whether a nonzero-length `data` field is permitted at all.
    pub data_allowed: bool,
    /// Whether non-token data should be decoded and displayed field-by-field, as opposed to
    /// being silently hashed and discarded.
    pub contract_details: bool,
    pub tokens: TokenTable,
}
