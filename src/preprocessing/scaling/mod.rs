//! Numeric scalers.

mod identity;
mod standard;

pub use identity::{FittedIdentityScaler, IdentityScaler, IdentityScalerParams};
pub use standard::{FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams};
