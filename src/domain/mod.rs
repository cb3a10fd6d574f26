// Domain layer: sizing rules, models and ports. No HTTP here.

pub mod address;
pub mod model;
pub mod ports;
pub mod sizing;
