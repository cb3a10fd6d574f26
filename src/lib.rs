pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::BookingStore;
pub use config::CourierConfig;
pub use crate::core::{courier::RoadieCourier, handler::handle_request};
pub use domain::sizing::{build_line_item, classify, validate_load};
pub use utils::error::{CourierError, Result};
