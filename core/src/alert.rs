//! Alerts raised by individual screening rules.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// One fired rule. Alerts are listed in rule-evaluation order, not by severity.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Alert {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
}

impl Alert {
    pub fn new(rule: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            severity,
            message: message.into(),
        }
    }
}
