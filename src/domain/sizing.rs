//! Load sizing: tier classification, load limits and the consolidated line item.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::model::{ShipmentLineItem, SizeTier};

pub const DEFAULT_MAX_ITEMS: u32 = 30;
pub const DEFAULT_MAX_WEIGHT_LB: u32 = 250;

/// Minimum declared value the courier accepts for insurance.
pub const MIN_INSURABLE_VALUE_USD: u32 = 100;
pub const BAG_VALUE_USD: u32 = 30;
pub const BOX_VALUE_USD: u32 = 40;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadRejection {
    #[error("no items to ship")]
    NoItems,

    #[error("too many items; maximum {max_items} bags/boxes combined")]
    TooManyItems { max_items: u32 },

    #[error("estimated weight exceeds courier maximum")]
    Overweight { weight_lb: u32, max_weight_lb: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadLimits {
    #[serde(default = "default_max_items")]
    pub max_items: u32,
    #[serde(default = "default_max_weight_lb")]
    pub max_weight_lb: u32,
}

fn default_max_items() -> u32 {
    DEFAULT_MAX_ITEMS
}

fn default_max_weight_lb() -> u32 {
    DEFAULT_MAX_WEIGHT_LB
}

impl Default for LoadLimits {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            max_weight_lb: DEFAULT_MAX_WEIGHT_LB,
        }
    }
}

impl LoadLimits {
    pub fn check(&self, bags_count: u32, boxes_count: u32) -> Result<(), LoadRejection> {
        let total = bags_count.saturating_add(boxes_count);
        if total == 0 {
            return Err(LoadRejection::NoItems);
        }
        if total > self.max_items {
            return Err(LoadRejection::TooManyItems {
                max_items: self.max_items,
            });
        }

        // Weight is approximated by the tier, not by weighing individual items.
        let weight_lb = classify(bags_count, boxes_count).profile().weight_lb;
        if weight_lb > self.max_weight_lb {
            return Err(LoadRejection::Overweight {
                weight_lb,
                max_weight_lb: self.max_weight_lb,
            });
        }

        Ok(())
    }
}

/// Checks a load against the default courier limits.
pub fn validate_load(bags_count: u32, boxes_count: u32) -> Result<(), LoadRejection> {
    LoadLimits::default().check(bags_count, boxes_count)
}

/// Boxes are bulkier than bags, so box thresholds are checked first.
pub fn classify(bags_count: u32, boxes_count: u32) -> SizeTier {
    if boxes_count >= 11 {
        SizeTier::Huge
    } else if boxes_count >= 6 || bags_count >= 11 {
        SizeTier::XLarge
    } else if boxes_count >= 3 || bags_count >= 6 {
        SizeTier::Large
    } else if boxes_count >= 1 || bags_count >= 3 {
        SizeTier::Medium
    } else {
        SizeTier::Small
    }
}

pub fn insurable_value_usd(bags_count: u32, boxes_count: u32) -> u32 {
    let declared = bags_count
        .saturating_mul(BAG_VALUE_USD)
        .saturating_add(boxes_count.saturating_mul(BOX_VALUE_USD));
    declared.max(MIN_INSURABLE_VALUE_USD)
}

/// The whole load travels as one line item; the courier bills and insures per shipment.
pub fn build_line_item(bags_count: u32, boxes_count: u32) -> ShipmentLineItem {
    let tier = classify(bags_count, boxes_count);
    let profile = tier.profile();

    ShipmentLineItem {
        description: format!(
            "Donation items: {} bags, {} boxes",
            bags_count, boxes_count
        ),
        size_tier: tier,
        length_in: profile.length_in,
        width_in: profile.width_in,
        height_in: profile.height_in,
        weight_lb: profile.weight_lb,
        quantity: 1,
        insurable_value_usd: insurable_value_usd(bags_count, boxes_count),
    }
}
