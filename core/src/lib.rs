//! txscreen-core: heuristic screening of a single proposed transaction.
//!
//! The entry point is [`rule_evaluator::RuleEvaluator`]. Everything here is
//! synchronous and free of shared mutable state; the HTTP layer lives in the
//! `txscreen-server` crate.

pub mod alert;
pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod report;
pub mod rule_evaluator;
pub mod serde_utils;
pub mod types;

pub use alert::{Alert, Severity};
pub use input::{TimestampSource, TransactionInput};
pub use report::{Report, RiskLevel};
pub use rule_evaluator::RuleEvaluator;
