use std::cmp;
use serde::{Serialize, Deserialize};

/// Escrow days for each side of a trade. Only valid at the time it was fetched.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct EscrowDuration {
    /// Days our items would be held.
    pub my_escrow_days: u32,
    /// Days their items would be held.
    pub their_escrow_days: u32,
}

impl EscrowDuration {
    /// Whether either side of the trade would be held.
    pub fn has_escrow(&self) -> bool {
        self.their_escrow_days > 0 || self.my_escrow_days > 0
    }

    /// The longest hold in days.
    pub fn hold_duration_days(&self) -> u32 {
        cmp::max(self.their_escrow_days, self.my_escrow_days)
    }
}
