pub mod courier_config;

pub use courier_config::{CourierConfig, PersistenceConfig, RoadieConfig, ShipmentOptions};
