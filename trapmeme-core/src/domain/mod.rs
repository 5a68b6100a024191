//! Domain types for the signal lab

pub mod bar;
pub mod risk_profile;
pub mod series;

pub use bar::PriceBar;
pub use risk_profile::RiskProfile;
pub use series::{PriceSeries, SMA_WINDOW};
