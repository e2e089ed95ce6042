use crate::error::ParameterError;
use crate::types::ServerTime;

/// Options for listing trade offers. At least one of sent or received offers must be requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTradeOffersOptions {
    /// Include offers we sent.
    pub get_sent_offers: bool,
    /// Include offers we received.
    pub get_received_offers: bool,
    /// Include descriptions for the items in the offers.
    pub get_descriptions: bool,
    /// Only include offers that are active, or were active since `historical_cutoff`.
    pub active_only: bool,
    /// Only include offers that are not active.
    pub historical_only: bool,
    /// With `active_only`, also include offers updated since this time.
    pub historical_cutoff: Option<ServerTime>,
}

impl Default for GetTradeOffersOptions {
    fn default() -> Self {
        Self {
            get_sent_offers: true,
            get_received_offers: true,
            get_descriptions: false,
            active_only: true,
            historical_only: false,
            historical_cutoff: None,
        }
    }
}

impl GetTradeOffersOptions {
    /// Options for active sent and received offers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(mut self, get_sent_offers: bool) -> Self {
        self.get_sent_offers = get_sent_offers;
        self
    }

    pub fn received(mut self, get_received_offers: bool) -> Self {
        self.get_received_offers = get_received_offers;
        self
    }

    pub fn descriptions(mut self, get_descriptions: bool) -> Self {
        self.get_descriptions = get_descriptions;
        self
    }

    pub fn active_only(mut self, active_only: bool) -> Self {
        self.active_only = active_only;
        self
    }

    pub fn historical_only(mut self, historical_only: bool) -> Self {
        self.historical_only = historical_only;
        self
    }

    pub fn historical_cutoff(mut self, historical_cutoff: ServerTime) -> Self {
        self.historical_cutoff = Some(historical_cutoff);
        self
    }

    /// Fails with [`ParameterError::InvalidQuery`] when neither sent nor received offers are
    /// requested.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !self.get_sent_offers && !self.get_received_offers {
            return Err(ParameterError::InvalidQuery);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_query() {
        let options = GetTradeOffersOptions::new()
            .sent(false)
            .received(false);

        assert!(matches!(options.validate(), Err(ParameterError::InvalidQuery)));
        assert!(GetTradeOffersOptions::new().sent(false).validate().is_ok());
    }
}
