//! Rule evaluator: screens a single transaction against seven fixed
//! heuristic rules and builds the risk report.
//!
//! Rules run in a fixed order and each one adds its points to a running
//! score:
//!   1. FICA threshold exceeded     (amount > 10,000)
//!   2. Possible structuring        (amount 9,995 - 9,999)
//!   3. Round amount                (whole thousands)
//!   4. Unusual hours               (00:00 - 04:59 UTC)
//!   5. Weekend transaction         (Saturday or Sunday, UTC)
//!   6. Micro transaction           (0 < amount < 10)
//!   7. Very large transaction      (amount > 100,000)
//!
//! Rules 3-5 only mark the transaction suspicious once the running score,
//! including their own points, has reached 30. Reordering rules changes
//! verdicts.
//!
//! Evaluation is pure apart from the clock read for `analyzedAt`.

use crate::{
    alert::{Alert, Severity},
    clock::{Clock, SystemClock},
    input::TransactionInput,
    report::{Analysis, Report, RiskLevel, TransactionDetails},
    serde_utils::display_amount,
    types::{Amount, RiskScore, MAX_RISK_SCORE},
};
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::sync::Arc;

// ── Constants ────────────────────────────────────────────────────────────────

const FICA_THRESHOLD: f64 = 10_000.0;
const STRUCTURING_AMOUNTS: [f64; 5] = [9_995.0, 9_996.0, 9_997.0, 9_998.0, 9_999.0];
const ROUND_AMOUNT_UNIT: f64 = 1_000.0;
const UNUSUAL_HOURS_LAST: u32 = 4; // 00:00 through 04:59 UTC
const MICRO_AMOUNT_CEILING: f64 = 10.0;
const VERY_LARGE_THRESHOLD: f64 = 100_000.0;

/// Running score at which rules 3-5 escalate to suspicious.
const ESCALATION_SCORE: RiskScore = 30;

// ── Rules ────────────────────────────────────────────────────────────────────

/// The values every rule is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct TransactionFacts<'a> {
    pub name: &'a str,
    pub amount: Amount,
    /// UTC hour, 0-23.
    pub hour: u32,
    pub minute: u32,
    /// UTC weekday, 0 = Sunday … 6 = Saturday.
    pub day_of_week: u32,
}

impl<'a> TransactionFacts<'a> {
    pub fn new(name: &'a str, amount: Amount, timestamp: DateTime<Utc>) -> Self {
        Self {
            name,
            amount,
            hour: timestamp.hour(),
            minute: timestamp.minute(),
            day_of_week: timestamp.weekday().num_days_from_sunday(),
        }
    }

    fn is_weekend(&self) -> bool {
        self.day_of_week == 0 || self.day_of_week == 6
    }
}

/// When a fired rule flips the transaction to suspicious.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    Always,
    AtRunningScore(RiskScore),
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    FicaThresholdExceeded,
    PossibleStructuring,
    RoundAmount,
    UnusualHours,
    WeekendTransaction,
    MicroTransaction,
    VeryLargeTransaction,
}

impl Rule {
    /// Evaluation order. Never reorder.
    pub const ALL: [Rule; 7] = [
        Rule::FicaThresholdExceeded,
        Rule::PossibleStructuring,
        Rule::RoundAmount,
        Rule::UnusualHours,
        Rule::WeekendTransaction,
        Rule::MicroTransaction,
        Rule::VeryLargeTransaction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rule::FicaThresholdExceeded => "FICA_THRESHOLD_EXCEEDED",
            Rule::PossibleStructuring   => "POSSIBLE_STRUCTURING",
            Rule::RoundAmount           => "ROUND_AMOUNT",
            Rule::UnusualHours          => "UNUSUAL_HOURS",
            Rule::WeekendTransaction    => "WEEKEND_TRANSACTION",
            Rule::MicroTransaction      => "MICRO_TRANSACTION",
            Rule::VeryLargeTransaction  => "VERY_LARGE_TRANSACTION",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Rule::FicaThresholdExceeded => Severity::High,
            Rule::PossibleStructuring   => Severity::High,
            Rule::RoundAmount           => Severity::Medium,
            Rule::UnusualHours          => Severity::Medium,
            Rule::WeekendTransaction    => Severity::Low,
            Rule::MicroTransaction      => Severity::Low,
            Rule::VeryLargeTransaction  => Severity::Critical,
        }
    }

    pub fn points(self) -> RiskScore {
        match self {
            Rule::FicaThresholdExceeded => 40,
            Rule::PossibleStructuring   => 35,
            Rule::RoundAmount           => 15,
            Rule::UnusualHours          => 20,
            Rule::WeekendTransaction    => 10,
            Rule::MicroTransaction      => 5,
            Rule::VeryLargeTransaction  => 50,
        }
    }

    pub fn escalation(self) -> Escalation {
        match self {
            Rule::FicaThresholdExceeded
            | Rule::PossibleStructuring
            | Rule::VeryLargeTransaction => Escalation::Always,
            Rule::RoundAmount
            | Rule::UnusualHours
            | Rule::WeekendTransaction => Escalation::AtRunningScore(ESCALATION_SCORE),
            Rule::MicroTransaction => Escalation::Never,
        }
    }

    pub fn fires(self, facts: &TransactionFacts<'_>) -> bool {
        let amount = facts.amount;
        match self {
            Rule::FicaThresholdExceeded => amount > FICA_THRESHOLD,
            Rule::PossibleStructuring => STRUCTURING_AMOUNTS.contains(&amount),
            Rule::RoundAmount => {
                amount > 0.0 && amount >= ROUND_AMOUNT_UNIT && amount % ROUND_AMOUNT_UNIT == 0.0
            }
            Rule::UnusualHours => facts.hour <= UNUSUAL_HOURS_LAST,
            Rule::WeekendTransaction => facts.is_weekend(),
            Rule::MicroTransaction => amount > 0.0 && amount < MICRO_AMOUNT_CEILING,
            Rule::VeryLargeTransaction => amount > VERY_LARGE_THRESHOLD,
        }
    }

    fn message(self, facts: &TransactionFacts<'_>) -> String {
        let amount = display_amount(facts.amount);
        match self {
            Rule::FicaThresholdExceeded => format!(
                "Transaction of R{amount} from {} exceeds the R10,000 FICA reporting threshold",
                facts.name
            ),
            Rule::PossibleStructuring => format!(
                "Transaction of R{amount} from {} is just below the R10,000 reporting threshold (possible structuring)",
                facts.name
            ),
            Rule::RoundAmount => format!(
                "Round amount of R{amount} is typical of structured or fabricated transactions"
            ),
            Rule::UnusualHours => format!(
                "Transaction at {:02}:{:02} UTC falls in the 00:00-04:59 unusual hours window",
                facts.hour, facts.minute
            ),
            Rule::WeekendTransaction => format!(
                "Transaction on a {} when business activity is low",
                if facts.day_of_week == 0 { "Sunday" } else { "Saturday" }
            ),
            Rule::MicroTransaction => format!(
                "Micro transaction of R{amount} may indicate card testing"
            ),
            Rule::VeryLargeTransaction => format!(
                "Transaction of R{amount} exceeds R100,000 and requires enhanced due diligence"
            ),
        }
    }
}

// ── Evaluation ───────────────────────────────────────────────────────────────

/// Screen `input` and stamp the report with `analyzed_at`.
pub fn evaluate_at(input: &TransactionInput, analyzed_at: DateTime<Utc>) -> Report {
    let facts = TransactionFacts::new(&input.name, input.amount, input.timestamp);

    let mut running: RiskScore = 0;
    let mut suspicious = false;
    let mut alerts = Vec::new();

    for rule in Rule::ALL {
        if !rule.fires(&facts) {
            continue;
        }

        running += rule.points();
        suspicious |= match rule.escalation() {
            Escalation::Always => true,
            Escalation::AtRunningScore(min) => running >= min,
            Escalation::Never => false,
        };

        log::debug!(
            "rule={} fired: +{} (running score {})",
            rule.name(),
            rule.points(),
            running
        );

        alerts.push(Alert::new(rule.name(), rule.severity(), rule.message(&facts)));
    }

    let risk_score = running.min(MAX_RISK_SCORE);
    let risk_level = RiskLevel::from_score(risk_score);

    let amount = display_amount(input.amount);
    let (summary, recommendation) = if suspicious {
        log::warn!(
            "Suspicious transaction: R{} from {} (score {}, {:?}, {} alerts)",
            amount,
            input.name,
            risk_score,
            risk_level,
            alerts.len()
        );
        (
            format!(
                "⚠️ ALERT: Transaction of R{amount} from {} has been flagged as suspicious.",
                input.name
            ),
            "Hold the transaction for manual compliance review and consider filing a suspicious transaction report."
                .to_string(),
        )
    } else {
        log::info!(
            "Transaction of R{} from {} screened (score {}, {} alerts)",
            amount,
            input.name,
            risk_score,
            alerts.len()
        );
        (
            format!("✅ Transaction of R{amount} from {} appears normal.", input.name),
            "No action required. Proceed with the transaction.".to_string(),
        )
    };

    Report {
        transaction_details: TransactionDetails {
            name: input.name.clone(),
            amount: input.amount,
            timestamp: input.timestamp,
            timestamp_source: input.timestamp_source,
            hour_utc: facts.hour,
            day_of_week: facts.day_of_week,
        },
        analysis: Analysis {
            suspicious,
            risk_score,
            risk_level,
            alerts_triggered: alerts.len(),
            summary,
        },
        alerts,
        recommendation,
        analyzed_at,
    }
}

// ── Evaluator ────────────────────────────────────────────────────────────────

/// Shared, immutable screening entry point. Cheap to clone.
#[derive(Clone)]
pub struct RuleEvaluator {
    clock: Arc<dyn Clock>,
}

impl RuleEvaluator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Evaluator backed by the system clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn evaluate(&self, input: &TransactionInput) -> Report {
        evaluate_at(input, self.clock.now())
    }

    /// Coerce raw request parameters, then evaluate.
    pub fn evaluate_params(
        &self,
        name: Option<&str>,
        amount: Option<&str>,
        timestamp: Option<&str>,
    ) -> Report {
        let input = TransactionInput::from_params(name, amount, timestamp, self.clock());
        self.evaluate(&input)
    }

    /// Evaluate decoded query pairs. The first occurrence of each key wins.
    pub fn evaluate_query(&self, pairs: &[(String, String)]) -> Report {
        let input = TransactionInput::from_query_pairs(pairs, self.clock());
        self.evaluate(&input)
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for RuleEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEvaluator").finish_non_exhaustive()
    }
}
