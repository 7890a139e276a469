/// Maximum byte length of an `int256`-shaped slot (gas price, start gas, value, gateway fee).
pub const MAX_INT256: usize = 32;
/// Byte length of an address slot.
pub const MAX_ADDRESS: usize = 20;
/// Maximum byte length of the `v` slot.
pub const MAX_V: usize = 4;

/// A bounded big-endian unsigned integer: up to [`MAX_INT256`] bytes, with the declared length
/// recorded separately so a shorter value isn't mistaken for a zero-padded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int256Slot {
    pub value: [u8; MAX_INT256],
    pub length: u8,
}

impl Default for Int256Slot {
    fn default() -> Self {
        Self {
            value: [0u8; MAX_INT256],
            length: 0,
        }
    }
}

impl Int256Slot {
    /// The bytes actually written, i.e. `value[..length]`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.value[..self.length as usize]
    }
}

/// A fixed 20-byte address slot with a presence length: `0` means absent (contract creation, no
/// gateway fee recipient, no fee currency override), `MAX_ADDRESS` means present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSlot {
    pub value: [u8; MAX_ADDRESS],
    pub length: u8,
}

impl Default for AddressSlot {
    fn default() -> Self {
        Self {
            value: [0u8; MAX_ADDRESS],
            length: 0,
        }
    }
}

impl AddressSlot {
    pub fn is_present(&self) -> bool {
        self.length != 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.value[..self.length as usize]
    }
}

/// A bounded `v` slot (up to [`MAX_V`] bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VSlot {
    pub value: [u8; MAX_V],
    pub length: u8,
}

impl Default for VSlot {
    fn default() -> Self {
        Self {
            value: [0u8; MAX_V],
            length: 0,
        }
    }
}

impl VSlot {
    pub fn as_bytes(&self) -> &[u8] {
        &self.value[..self.length as usize]
    }
}

/// The semantically meaningful fields extracted from a transaction stream.
///
/// Every slot's length is written exactly once, at the moment its field is fully consumed
/// (§3 invariant 7). `nonce`/`data`/`r`/`s` never reach this struct — they are hashed and
/// discarded, which is why there is no slot for them here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxContent {
    pub gasprice: Int256Slot,
    pub startgas: Int256Slot,
    pub value: Int256Slot,
    pub gateway_fee: Int256Slot,
    pub destination: AddressSlot,
    pub gateway_destination: AddressSlot,
    pub fee_currency: AddressSlot,
    pub v: VSlot,
    /// Set as soon as the `data` field is seen to have nonzero declared length.
    pub data_present: bool,
}
