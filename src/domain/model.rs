use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::address::AddressInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeTier {
    Small,
    Medium,
    Large,
    XLarge,
    Huge,
}

/// Physical envelope the courier is asked to carry for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierProfile {
    pub length_in: u32,
    pub width_in: u32,
    pub height_in: u32,
    pub weight_lb: u32,
    pub description: &'static str,
}

const SMALL: TierProfile = TierProfile {
    length_in: 12,
    width_in: 8,
    height_in: 6,
    weight_lb: 25,
    description: "Small package (1-2 bags)",
};

const MEDIUM: TierProfile = TierProfile {
    length_in: 24,
    width_in: 18,
    height_in: 12,
    weight_lb: 50,
    description: "Medium package (3-5 bags or 1-2 boxes)",
};

const LARGE: TierProfile = TierProfile {
    length_in: 36,
    width_in: 24,
    height_in: 18,
    weight_lb: 100,
    description: "Large load (6-10 bags or 3-5 boxes)",
};

const XLARGE: TierProfile = TierProfile {
    length_in: 48,
    width_in: 36,
    height_in: 24,
    weight_lb: 150,
    description: "Extra large load (11+ bags or 6-10 boxes)",
};

const HUGE: TierProfile = TierProfile {
    length_in: 72,
    width_in: 48,
    height_in: 48,
    weight_lb: 200,
    description: "Huge load (11+ boxes)",
};

impl SizeTier {
    pub fn profile(self) -> &'static TierProfile {
        match self {
            SizeTier::Small => &SMALL,
            SizeTier::Medium => &MEDIUM,
            SizeTier::Large => &LARGE,
            SizeTier::XLarge => &XLARGE,
            SizeTier::Huge => &HUGE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeTier::Small => "small",
            SizeTier::Medium => "medium",
            SizeTier::Large => "large",
            SizeTier::XLarge => "xlarge",
            SizeTier::Huge => "huge",
        }
    }
}

impl std::fmt::Display for SizeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadRequest {
    pub bags_count: u32,
    pub boxes_count: u32,
}

impl LoadRequest {
    pub fn new(bags_count: u32, boxes_count: u32) -> Self {
        Self {
            bags_count,
            boxes_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentLineItem {
    pub description: String,
    pub size_tier: SizeTier,
    pub length_in: u32,
    pub width_in: u32,
    pub height_in: u32,
    pub weight_lb: u32,
    pub quantity: u32,
    pub insurable_value_usd: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EstimateRequest {
    #[serde(alias = "pickup_address")]
    pub pickup: AddressInput,
    #[serde(alias = "delivery_address")]
    pub delivery: AddressInput,
    #[serde(default)]
    pub bags_count: u32,
    #[serde(default)]
    pub boxes_count: u32,
    #[serde(default)]
    pub pickup_after: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deliver_between: Option<TimeWindow>,
}

impl EstimateRequest {
    pub fn load(&self) -> LoadRequest {
        LoadRequest::new(self.bags_count, self.boxes_count)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShipmentRequest {
    pub booking_id: String,
    #[serde(alias = "pickup_address")]
    pub pickup: AddressInput,
    #[serde(alias = "delivery_address")]
    pub delivery: AddressInput,
    #[serde(default)]
    pub bags_count: u32,
    #[serde(default)]
    pub boxes_count: u32,
    pub pickup_after: DateTime<Utc>,
    #[serde(default)]
    pub deliver_between: Option<TimeWindow>,
}

impl ShipmentRequest {
    pub fn load(&self) -> LoadRequest {
        LoadRequest::new(self.bags_count, self.boxes_count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateResult {
    pub base_price_usd: f64,
    pub estimated_distance: Option<f64>,
    pub size_tier: SizeTier,
    pub size_description: String,
    pub provider_quote_id: Option<String>,
    pub raw_provider_response: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentResult {
    pub shipment_id: String,
    pub reference_id: String,
    pub state: String,
    pub tracking_url: Option<String>,
    pub size_tier: SizeTier,
    pub created_at: DateTime<Utc>,
    pub raw_provider_response: serde_json::Value,
}

/// What the booking store is told once the courier has accepted a shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    #[serde(skip_serializing)]
    #[serde(default)]
    pub booking_id: String,
    #[serde(rename = "courier_shipment_id")]
    pub shipment_id: String,
    #[serde(rename = "courier_reference_id")]
    pub reference_id: String,
    #[serde(rename = "courier_state")]
    pub state: String,
    #[serde(rename = "courier_tracking_url", skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ShipmentRecord {
    pub fn from_result(booking_id: &str, result: &ShipmentResult, at: DateTime<Utc>) -> Self {
        Self {
            booking_id: booking_id.to_string(),
            shipment_id: result.shipment_id.clone(),
            reference_id: result.reference_id.clone(),
            state: result.state.clone(),
            tracking_url: result.tracking_url.clone(),
            updated_at: at,
        }
    }
}
