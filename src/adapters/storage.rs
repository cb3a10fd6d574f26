use crate::config::PersistenceConfig;
use crate::domain::model::ShipmentRecord;
use crate::domain::ports::ShipmentRecorder;
use crate::utils::error::{StoreError, StoreResult};
use async_trait::async_trait;
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Updates the booking row through the hosted database's REST interface.
/// Every write is bounded by `timeout`, so a stalled database surfaces as a
/// `StoreError` instead of holding up a shipment the courier already accepted.
#[derive(Debug, Clone)]
pub struct RestBookingStore {
    client: Client,
    endpoint: String,
    api_key: String,
    table: String,
}

impl RestBookingStore {
    pub fn new(
        endpoint: String,
        api_key: String,
        table: String,
        timeout: Duration,
    ) -> StoreResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            table,
        })
    }
}

#[async_trait]
impl ShipmentRecorder for RestBookingStore {
    async fn record_shipment(&self, record: &ShipmentRecord) -> StoreResult<()> {
        let url = format!(
            "{}/rest/v1/{}",
            self.endpoint.trim_end_matches('/'),
            self.table
        );
        tracing::debug!("🗄️ PATCH {} for booking {}", url, record.booking_id);

        let response = self
            .client
            .patch(&url)
            .query(&[("id", format!("eq.{}", record.booking_id))])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// 本地 JSON 檔案存放，每個 booking 一個檔案
#[derive(Debug, Clone)]
pub struct LocalBookingStore {
    base_path: String,
}

impl LocalBookingStore {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn record_path(&self, booking_id: &str) -> StoreResult<PathBuf> {
        let unsafe_key = booking_id.trim().is_empty()
            || booking_id.contains('/')
            || booking_id.contains('\\')
            || booking_id.contains("..");
        if unsafe_key {
            return Err(StoreError::InvalidKey {
                booking_id: booking_id.to_string(),
            });
        }

        Ok(Path::new(&self.base_path).join(format!("{}.json", booking_id)))
    }
}

#[async_trait]
impl ShipmentRecorder for LocalBookingStore {
    async fn record_shipment(&self, record: &ShipmentRecord) -> StoreResult<()> {
        let full_path = self.record_path(&record.booking_id)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec_pretty(record)?;
        fs::write(&full_path, data)?;
        tracing::debug!("🗄️ Booking record written to {}", full_path.display());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum BookingStore {
    Disabled,
    Rest(RestBookingStore),
    Local(LocalBookingStore),
}

impl BookingStore {
    pub fn from_config(config: &PersistenceConfig) -> StoreResult<Self> {
        let store = match config {
            PersistenceConfig::None => BookingStore::Disabled,
            PersistenceConfig::Rest {
                endpoint,
                api_key,
                table,
                timeout_seconds,
            } => BookingStore::Rest(RestBookingStore::new(
                endpoint.clone(),
                api_key.clone(),
                table.clone(),
                Duration::from_secs(*timeout_seconds),
            )?),
            PersistenceConfig::Local { path } => {
                BookingStore::Local(LocalBookingStore::new(path.clone()))
            }
        };
        Ok(store)
    }
}

#[async_trait]
impl ShipmentRecorder for BookingStore {
    async fn record_shipment(&self, record: &ShipmentRecord) -> StoreResult<()> {
        match self {
            BookingStore::Disabled => {
                tracing::debug!(
                    "Booking persistence disabled, skipping update for {}",
                    record.booking_id
                );
                Ok(())
            }
            BookingStore::Rest(store) => store.record_shipment(record).await,
            BookingStore::Local(store) => store.record_shipment(record).await,
        }
    }
}
