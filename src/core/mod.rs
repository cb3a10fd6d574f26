pub mod courier;
pub mod handler;
pub mod payload;

pub use crate::domain::model::{
    EstimateRequest, EstimateResult, LoadRequest, ShipmentRecord, ShipmentRequest, ShipmentResult,
    SizeTier,
};
pub use crate::domain::ports::{Courier, ShipmentRecorder};
pub use crate::utils::error::Result;
