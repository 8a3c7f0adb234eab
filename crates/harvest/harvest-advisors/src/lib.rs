//! # harvest-advisors
//!
//! Rule-based reference advisors. They exercise the full advisor contract
//! (relevant fields, factors, stale-data reporting, cancellation) without a
//! trained model behind them.

pub mod crop;
pub mod defaults;
pub mod fertilizer;
pub mod irrigation;
mod scoring;
pub mod sustainability;

pub use crop::CropAdvisor;
pub use defaults::{default_degradation_config, register_defaults};
pub use fertilizer::FertilizerAdvisor;
pub use irrigation::IrrigationAdvisor;
pub use sustainability::SustainabilityAdvisor;
