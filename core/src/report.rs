//! The risk report returned for every screened transaction.

use crate::{
    alert::Alert,
    input::TimestampSource,
    serde_utils::{serialize_amount, serialize_millis},
    types::{Amount, RiskScore},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ── Constants ────────────────────────────────────────────────────────────────

const CRITICAL_SCORE: RiskScore = 70;
const HIGH_SCORE: RiskScore = 50;
const MEDIUM_SCORE: RiskScore = 30;

// ── Risk level ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Classify a clamped risk score.
    pub fn from_score(score: RiskScore) -> Self {
        if score >= CRITICAL_SCORE {
            RiskLevel::Critical
        } else if score >= HIGH_SCORE {
            RiskLevel::High
        } else if score >= MEDIUM_SCORE {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

// ── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub name: String,
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Amount,
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
    pub timestamp_source: TimestampSource,
    /// Hour of day in UTC, 0-23.
    pub hour_utc: u32,
    /// 0 = Sunday … 6 = Saturday, UTC.
    pub day_of_week: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub suspicious: bool,
    pub risk_score: RiskScore,
    pub risk_level: RiskLevel,
    pub alerts_triggered: usize,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub transaction_details: TransactionDetails,
    pub analysis: Analysis,
    pub alerts: Vec<Alert>,
    pub recommendation: String,
    #[serde(serialize_with = "serialize_millis")]
    pub analyzed_at: DateTime<Utc>,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
