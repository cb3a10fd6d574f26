use crate::domain::model::{
    EstimateRequest, EstimateResult, ShipmentRecord, ShipmentRequest, ShipmentResult,
};
use crate::utils::error::{Result, StoreResult};
use async_trait::async_trait;

#[async_trait]
pub trait Courier: Send + Sync {
    async fn get_estimate(&self, request: &EstimateRequest) -> Result<EstimateResult>;
    async fn create_shipment(&self, request: &ShipmentRequest) -> Result<ShipmentResult>;
}

/// The booking record lives outside this crate; this is the single write
/// made after a shipment exists on the courier side.
#[async_trait]
pub trait ShipmentRecorder: Send + Sync {
    async fn record_shipment(&self, record: &ShipmentRecord) -> StoreResult<()>;
}
