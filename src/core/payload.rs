//! Request bodies for the Roadie API and normalisation of what comes back.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::config::ShipmentOptions;
use crate::domain::address::CourierLocation;
use crate::domain::model::{EstimateResult, ShipmentLineItem, ShipmentResult, SizeTier, TimeWindow};
use crate::utils::error::{CourierError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadieItem {
    pub description: String,
    pub length: u32,
    pub width: u32,
    pub height: u32,
    pub weight: u32,
    pub value: u32,
    pub quantity: u32,
}

impl From<&ShipmentLineItem> for RoadieItem {
    fn from(item: &ShipmentLineItem) -> Self {
        Self {
            description: item.description.clone(),
            length: item.length_in,
            width: item.width_in,
            height: item.height_in,
            weight: item.weight_lb,
            value: item.insurable_value_usd,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EstimatePayload {
    pub items: Vec<RoadieItem>,
    pub pickup_location: CourierLocation,
    pub delivery_location: CourierLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_after: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliver_between: Option<TimeWindow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipmentPayload {
    pub reference_id: String,
    pub idempotency_key: String,
    pub description: String,
    pub items: Vec<RoadieItem>,
    pub pickup_location: CourierLocation,
    pub delivery_location: CourierLocation,
    pub pickup_after: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliver_between: Option<TimeWindow>,
    pub options: ShipmentOptions,
}

/// Unique per call, so a retried creation is still distinguishable on the
/// courier side. The booking id stays recoverable as the prefix.
pub fn idempotency_key(booking_id: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", booking_id, at.timestamp_millis())
}

fn lookup<'a>(body: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(body, |current, key| current.get(*key))
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

type PriceStrategy = fn(&Value) -> Option<f64>;

fn price_in_dollars(body: &Value) -> Option<f64> {
    body.get("price").and_then(number)
}

fn fee_in_cents(body: &Value) -> Option<f64> {
    body.get("fee").and_then(number).map(|cents| cents / 100.0)
}

fn nested_quote_price(body: &Value) -> Option<f64> {
    lookup(body, &["quote", "price"]).and_then(number)
}

// The provider's estimate shape has changed over time; tried in order.
const PRICE_STRATEGIES: [PriceStrategy; 3] = [price_in_dollars, fee_in_cents, nested_quote_price];

/// Dollar amount rounded to cents, or `None` when no strategy finds a price.
pub fn extract_price(body: &Value) -> Option<f64> {
    PRICE_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(body))
        .map(round_cents)
}

pub fn estimate_from_response(body: Value, tier: SizeTier, status: u16) -> Result<EstimateResult> {
    let base_price_usd = extract_price(&body).ok_or_else(|| CourierError::Provider {
        status,
        message: format!("estimate response did not include a price: {}", body),
    })?;

    let estimated_distance = ["estimated_distance", "distance"]
        .iter()
        .find_map(|key| body.get(*key).and_then(number));

    let provider_quote_id = [&["id"][..], &["quote", "id"][..], &["estimate_id"][..]]
        .iter()
        .find_map(|path| lookup(&body, path).and_then(text));

    Ok(EstimateResult {
        base_price_usd,
        estimated_distance,
        size_tier: tier,
        size_description: tier.profile().description.to_string(),
        provider_quote_id,
        raw_provider_response: body,
    })
}

pub fn shipment_from_response(
    body: Value,
    booking_id: &str,
    tier: SizeTier,
    requested_at: DateTime<Utc>,
    status: u16,
) -> Result<ShipmentResult> {
    let shipment_id = body.get("id").and_then(text).ok_or_else(|| CourierError::Provider {
        status,
        message: format!("shipment response did not include an id: {}", body),
    })?;

    let state = body
        .get("state")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let tracking_url = body.get("tracking_url").and_then(text);

    let created_at = body
        .get("created_at")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or(requested_at);

    Ok(ShipmentResult {
        shipment_id,
        reference_id: booking_id.to_string(),
        state,
        tracking_url,
        size_tier: tier,
        created_at,
        raw_provider_response: body,
    })
}
