//! Client and value fields collected by the wizard.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ClientId, Percentage, ValidationError};

/// Fields of the Client & Period step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFields {
    pub client_id: Option<ClientId>,
    pub contract_id: Option<String>,
    pub campaign_name: Option<String>,
}

impl ClientFields {
    /// Required: `client_id`.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.client_id.is_none() {
            errors.push(ValidationError::missing_field("client_id"));
        }
        errors
    }
}

/// Fields of the Values step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueFields {
    pub unit_price_cents: Option<u64>,
    #[serde(rename = "discountPercent", default)]
    pub discount: Percentage,
    pub notes: Option<String>,
}

impl ValueFields {
    /// Required: `unit_price_cents`.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.unit_price_cents.is_none() {
            errors.push(ValidationError::missing_field("unit_price_cents"));
        }
        errors
    }

    /// Unit price after the discount.
    pub fn net_unit_price_cents(&self) -> Option<u64> {
        self.unit_price_cents.map(|price| self.discount.discount(price))
    }

    /// Net total for `resource_count` resources.
    pub fn total_cents(&self, resource_count: usize) -> Option<u64> {
        self.net_unit_price_cents()
            .map(|net| net.saturating_mul(resource_count as u64))
    }
}
