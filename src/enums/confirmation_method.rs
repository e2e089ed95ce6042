use num_enum::{TryFromPrimitive, IntoPrimitive};
use serde_repr::{Serialize_repr, Deserialize_repr};
use strum::{Display, EnumString};

/// How a trade offer is confirmed by its sender.
#[derive(Serialize_repr, Deserialize_repr, Display, EnumString, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Clone, Copy)]
#[repr(u8)]
pub enum ConfirmationMethod {
    /// No confirmation needed.
    None = 0,
    /// Confirmed by email.
    Email = 1,
    /// Confirmed in the mobile app.
    MobileApp = 2,
}

impl Default for ConfirmationMethod {
    fn default() -> Self {
        Self::None
    }
}
