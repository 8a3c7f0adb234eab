//! # harvest-context
//!
//! Resolves a [`RecommendationContext`](harvest_core::models::RecommendationContext)
//! from independent upstream sources. Every field is fetched on its own; a
//! failure marks that field missing (or substitutes a regional default when
//! the degradation policy says so) instead of failing the request.

pub mod caching;
pub mod regional_defaults;
pub mod resolver;

pub use caching::CachingSource;
pub use regional_defaults::{RegionProfile, RegionalDefaults};
pub use resolver::LayeredContextResolver;
