//! Shared primitive types used across the screening crate.

/// Additive risk points. Accumulated unclamped, then capped at `MAX_RISK_SCORE`.
pub type RiskScore = u32;

/// A transaction amount in rand, after query coercion.
pub type Amount = f64;

/// Upper bound of the reported risk score.
pub const MAX_RISK_SCORE: RiskScore = 100;
