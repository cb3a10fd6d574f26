use crate::config::CourierConfig;
use crate::core::payload::{
    estimate_from_response, idempotency_key, shipment_from_response, EstimatePayload, RoadieItem,
    ShipmentPayload,
};
use crate::domain::address::{AddressInput, CourierLocation};
use crate::domain::model::{
    EstimateRequest, EstimateResult, LoadRequest, ShipmentLineItem, ShipmentRecord,
    ShipmentRequest, ShipmentResult,
};
use crate::domain::ports::{Courier, ShipmentRecorder};
use crate::domain::sizing::build_line_item;
use crate::utils::error::{CourierError, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const ESTIMATES_PATH: &str = "/v1/estimates";
const SHIPMENTS_PATH: &str = "/v1/shipments";

/// Roadie adapter. One HTTP attempt per call, no retries.
pub struct RoadieCourier<R: ShipmentRecorder> {
    config: CourierConfig,
    client: Client,
    recorder: R,
}

impl<R: ShipmentRecorder> RoadieCourier<R> {
    pub fn new(config: CourierConfig, recorder: R) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.roadie.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder.build().map_err(|e| {
            CourierError::configuration(format!("Cannot build HTTP client: {}", e))
        })?;

        Ok(Self {
            config,
            client,
            recorder,
        })
    }

    /// Token, load limits and addresses are all checked before any request is made.
    fn prepare(
        &self,
        load: LoadRequest,
        pickup: &AddressInput,
        delivery: &AddressInput,
    ) -> Result<(String, ShipmentLineItem, CourierLocation, CourierLocation)> {
        let token = self.config.bearer_token()?.to_string();

        self.config
            .limits
            .check(load.bags_count, load.boxes_count)?;

        let pickup_location = CourierLocation::from_input(pickup, "pickup")?;
        let delivery_location = CourierLocation::from_input(delivery, "delivery")?;
        let item = build_line_item(load.bags_count, load.boxes_count);

        Ok((token, item, pickup_location, delivery_location))
    }

    async fn post_json<T: Serialize + Sync>(
        &self,
        path: &str,
        token: &str,
        payload: &T,
    ) -> Result<(u16, Value)> {
        let url = self.config.endpoint(path);
        tracing::debug!("📡 POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("❌ Courier request to {} failed: {}", url, e);
                CourierError::Transport {
                    message: "failed to reach the courier network".to_string(),
                }
            })?;

        let status = response.status();
        tracing::debug!("📡 Courier response status: {}", status);

        let body = response.text().await.map_err(|e| {
            tracing::error!("❌ Reading courier response from {} failed: {}", url, e);
            CourierError::Transport {
                message: "failed to read the courier response".to_string(),
            }
        })?;

        if !status.is_success() {
            tracing::warn!("⚠️ Courier rejected request ({}): {}", status, body);
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("courier request failed")
                    .to_string()
            } else {
                body
            };
            return Err(CourierError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let json = serde_json::from_str::<Value>(&body).map_err(|e| CourierError::Provider {
            status: status.as_u16(),
            message: format!("unparseable courier response: {}", e),
        })?;

        Ok((status.as_u16(), json))
    }

    /// Creates the shipment with an explicit clock, then records it. A failed
    /// record write is logged; the courier-side shipment exists either way.
    pub async fn create_shipment_at(
        &self,
        request: &ShipmentRequest,
        now: DateTime<Utc>,
    ) -> Result<ShipmentResult> {
        let (token, item, pickup_location, delivery_location) =
            self.prepare(request.load(), &request.pickup, &request.delivery)?;

        if request.booking_id.trim().is_empty() {
            return Err(CourierError::validation("booking_id is required"));
        }

        let payload = ShipmentPayload {
            reference_id: request.booking_id.clone(),
            idempotency_key: idempotency_key(&request.booking_id, now),
            description: item.description.clone(),
            items: vec![RoadieItem::from(&item)],
            pickup_location,
            delivery_location,
            pickup_after: request.pickup_after,
            deliver_between: request.deliver_between.clone(),
            options: self.config.shipment.clone(),
        };

        tracing::info!(
            "🚚 Creating shipment for booking {} ({} tier, key {})",
            request.booking_id,
            item.size_tier,
            payload.idempotency_key
        );

        let (status, body) = self.post_json(SHIPMENTS_PATH, &token, &payload).await?;
        let shipment =
            shipment_from_response(body, &request.booking_id, item.size_tier, now, status)?;

        tracing::info!(
            "✅ Shipment {} created for booking {} (state: {})",
            shipment.shipment_id,
            shipment.reference_id,
            shipment.state
        );

        let record = ShipmentRecord::from_result(&request.booking_id, &shipment, Utc::now());
        if let Err(e) = self.recorder.record_shipment(&record).await {
            tracing::error!(
                "❌ Shipment {} created but booking {} was not updated: {}",
                shipment.shipment_id,
                request.booking_id,
                e
            );
        }

        Ok(shipment)
    }
}

#[async_trait::async_trait]
impl<R: ShipmentRecorder> Courier for RoadieCourier<R> {
    async fn get_estimate(&self, request: &EstimateRequest) -> Result<EstimateResult> {
        let (token, item, pickup_location, delivery_location) =
            self.prepare(request.load(), &request.pickup, &request.delivery)?;

        let payload = EstimatePayload {
            items: vec![RoadieItem::from(&item)],
            pickup_location,
            delivery_location,
            pickup_after: request.pickup_after,
            deliver_between: request.deliver_between.clone(),
        };

        tracing::info!(
            "💲 Requesting estimate for {} bags, {} boxes ({} tier)",
            request.bags_count,
            request.boxes_count,
            item.size_tier
        );

        let (status, body) = self.post_json(ESTIMATES_PATH, &token, &payload).await?;
        let estimate = estimate_from_response(body, item.size_tier, status)?;

        tracing::info!("✅ Estimate received: ${:.2}", estimate.base_price_usd);
        Ok(estimate)
    }

    async fn create_shipment(&self, request: &ShipmentRequest) -> Result<ShipmentResult> {
        self.create_shipment_at(request, Utc::now()).await
    }
}
