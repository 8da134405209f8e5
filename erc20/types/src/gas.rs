use crate::{StdError, StdResult};

/// Tracks resource consumption against a fixed limit.
///
/// The packet transport and the embedded VM each run their own meter; the
/// caller reconciles the two by consuming the VM's reported usage on the
/// outer meter after each VM call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    used: u64,
}

impl GasMeter {
    pub fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    /// A meter that, for practical purposes, never runs out. Used where the
    /// transport declares no explicit budget.
    pub fn unlimited() -> Self {
        Self::new(u64::MAX)
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }

    pub fn is_out_of_gas(&self) -> bool {
        self.used >= self.limit
    }

    /// Record `amount` units of consumption. Errors if this exceeds the
    /// limit; the overshoot is still recorded, mirroring how the transport's
    /// meter clamps at the limit.
    pub fn consume(&mut self, amount: u64, comment: &'static str) -> StdResult<()> {
        self.used = self.used.saturating_add(amount);

        if self.used > self.limit {
            return Err(StdError::OutOfGas {
                limit: self.limit,
                used: self.used,
                comment,
            });
        }

        Ok(())
    }
}

// ----------------------------------- tests -----------------------------------
