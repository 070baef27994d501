use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::FieldViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalLevel {
    Low,
    Moderate,
    Elevated,
    High,
}

impl SignalLevel {
    pub fn ordinal(self) -> u8 {
        match self {
            SignalLevel::Low => 0,
            SignalLevel::Moderate => 1,
            SignalLevel::Elevated => 2,
            SignalLevel::High => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SignalLevel::Low => "Low",
            SignalLevel::Moderate => "Moderate",
            SignalLevel::Elevated => "Elevated",
            SignalLevel::High => "High",
        }
    }
}

impl fmt::Display for SignalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountTenure {
    New,
    Established,
    Longstanding,
}

impl AccountTenure {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountTenure::New => "new",
            AccountTenure::Established => "established",
            AccountTenure::Longstanding => "longstanding",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeniorInvolvement {
    Rarely,
    Occasionally,
    Frequently,
    Constantly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeLevel {
    None,
    Occasional,
    Regular,
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessAdherence {
    Strong,
    Moderate,
    Weak,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeholderAccess {
    Excellent,
    Good,
    Limited,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTone {
    Positive,
    Neutral,
    Mixed,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseTime {
    Fast,
    Normal,
    Slow,
    VerySlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeCreep {
    None,
    Occasional,
    Frequent,
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentBehaviour {
    Early,
    OnTime,
    Delayed,
    VeryDelayed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetainerRealityInput {
    pub scoped_hours_per_month: f64,
    pub actual_hours_delivered: f64,
    pub senior_involvement_frequency: SeniorInvolvement,
    pub scope_change_requests: u32,
    pub exception_handling_normalized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDriftInput {
    pub planned_vs_reactive_ratio: f64,
    pub last_minute_requests_per_week: f64,
    pub missed_deadlines_last_3_months: u32,
    pub team_overtime: OvertimeLevel,
    pub process_adherence_level: ProcessAdherence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRiskInput {
    pub stakeholder_accessibility: StakeholderAccess,
    pub feedback_tone: FeedbackTone,
    pub response_time_to_requests: ResponseTime,
    pub scope_creep_behaviour: ScopeCreep,
    pub payment_behaviour: PaymentBehaviour,
    pub recent_escalations: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    pub account_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retainer_monthly_value: Option<f64>,
    pub account_tenure: AccountTenure,
    pub team_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub retainer_reality: RetainerRealityInput,
    pub delivery_drift: DeliveryDriftInput,
    pub client_risk: ClientRiskInput,
}

impl AccountInput {
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();

        if self.account_name.trim().is_empty() {
            violations.push(FieldViolation::new("accountName", "must not be empty"));
        }
        if self.team_size < 1 {
            violations.push(FieldViolation::new("teamSize", "must be at least 1"));
        }
        if let Some(value) = self.retainer_monthly_value {
            if value < 0.0 {
                violations.push(FieldViolation::new(
                    "retainerMonthlyValue",
                    "must not be negative",
                ));
            }
        }
        if self.retainer_reality.scoped_hours_per_month < 0.0 {
            violations.push(FieldViolation::new(
                "retainerReality.scopedHoursPerMonth",
                "must not be negative",
            ));
        }
        if self.retainer_reality.actual_hours_delivered < 0.0 {
            violations.push(FieldViolation::new(
                "retainerReality.actualHoursDelivered",
                "must not be negative",
            ));
        }
        if !(0.0..=100.0).contains(&self.delivery_drift.planned_vs_reactive_ratio) {
            violations.push(FieldViolation::new(
                "deliveryDrift.plannedVsReactiveRatio",
                "must be between 0 and 100",
            ));
        }
        if self.delivery_drift.last_minute_requests_per_week < 0.0 {
            violations.push(FieldViolation::new(
                "deliveryDrift.lastMinuteRequestsPerWeek",
                "must not be negative",
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalResult {
    pub level: SignalLevel,
    pub score: u32,
    pub explanation: String,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallAssessment {
    pub level: SignalLevel,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub priority_actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: Uuid,
    pub account_name: String,
    pub analysis_date: DateTime<Utc>,
    pub retainer_reality_signal: SignalResult,
    pub delivery_drift_signal: SignalResult,
    pub client_risk_signal: SignalResult,
    pub overall_assessment: OverallAssessment,
    pub markdown_report: String,
}
