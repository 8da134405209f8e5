use serde::{Deserialize, Serialize};

/// Module-wide switches, persisted and consulted on every conversion attempt.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// Master switch. When off, inbound packets pass through untouched and
    /// conversions are refused.
    pub enable_erc20: bool,
    /// Whether unseen voucher denoms may auto-register a bridge pair on
    /// arrival.
    pub permissionless_registration: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            enable_erc20: true,
            permissionless_registration: true,
        }
    }
}
