//! JSON request/response surface used by edge functions and the Lambda binary.

use serde::{Deserialize, Serialize};

use crate::domain::model::{EstimateRequest, EstimateResult, ShipmentRequest, ShipmentResult};
use crate::domain::ports::Courier;
use crate::utils::error::CourierError;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CourierRequest {
    Estimate(EstimateRequest),
    CreateShipment(ShipmentRequest),
}

/// `{ success: true, estimate | shipment }` or `{ success: false, error, status? }`.
#[derive(Debug, Clone, Serialize)]
pub struct CourierResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<EstimateResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment: Option<ShipmentResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl CourierResponse {
    pub fn estimate(estimate: EstimateResult) -> Self {
        Self {
            success: true,
            estimate: Some(estimate),
            shipment: None,
            error: None,
            status: None,
        }
    }

    pub fn shipment(shipment: ShipmentResult) -> Self {
        Self {
            success: true,
            estimate: None,
            shipment: Some(shipment),
            error: None,
            status: None,
        }
    }

    pub fn failure(error: &CourierError) -> Self {
        Self {
            success: false,
            estimate: None,
            shipment: None,
            error: Some(error.to_string()),
            status: error.status(),
        }
    }
}

pub async fn handle_request<C: Courier + ?Sized>(
    courier: &C,
    request: CourierRequest,
) -> CourierResponse {
    let outcome = match &request {
        CourierRequest::Estimate(estimate) => courier
            .get_estimate(estimate)
            .await
            .map(CourierResponse::estimate),
        CourierRequest::CreateShipment(shipment) => courier
            .create_shipment(shipment)
            .await
            .map(CourierResponse::shipment),
    };

    outcome.unwrap_or_else(|e| {
        tracing::error!(
            "❌ Courier request failed: {} (Category: {:?})",
            e,
            e.category()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        CourierResponse::failure(&e)
    })
}
