use std::path::Path;

use anyhow::{bail, Context};

use crate::analysis;
use crate::models::{
    AccountInput, AccountTenure, ClientRiskInput, DeliveryDriftInput, FeedbackTone, OvertimeLevel,
    PaymentBehaviour, ProcessAdherence, ResponseTime, RetainerRealityInput, ScopeCreep,
    SeniorInvolvement, StakeholderAccess,
};
use crate::store::AnalysisStore;

// One flattened account observation per row, snake_case headers.
#[derive(Debug, serde::Deserialize)]
struct AccountRow {
    account_name: String,
    client_industry: Option<String>,
    retainer_monthly_value: Option<f64>,
    account_tenure: AccountTenure,
    team_size: u32,
    notes: Option<String>,
    scoped_hours_per_month: f64,
    actual_hours_delivered: f64,
    senior_involvement_frequency: SeniorInvolvement,
    scope_change_requests: u32,
    exception_handling_normalized: bool,
    planned_vs_reactive_ratio: f64,
    last_minute_requests_per_week: f64,
    missed_deadlines_last_3_months: u32,
    team_overtime: OvertimeLevel,
    process_adherence_level: ProcessAdherence,
    stakeholder_accessibility: StakeholderAccess,
    feedback_tone: FeedbackTone,
    response_time_to_requests: ResponseTime,
    scope_creep_behaviour: ScopeCreep,
    payment_behaviour: PaymentBehaviour,
    recent_escalations: u32,
}

impl AccountRow {
    fn into_input(self) -> AccountInput {
        AccountInput {
            account_name: self.account_name,
            client_industry: self.client_industry,
            retainer_monthly_value: self.retainer_monthly_value,
            account_tenure: self.account_tenure,
            team_size: self.team_size,
            notes: self.notes,
            retainer_reality: RetainerRealityInput {
                scoped_hours_per_month: self.scoped_hours_per_month,
                actual_hours_delivered: self.actual_hours_delivered,
                senior_involvement_frequency: self.senior_involvement_frequency,
                scope_change_requests: self.scope_change_requests,
                exception_handling_normalized: self.exception_handling_normalized,
            },
            delivery_drift: DeliveryDriftInput {
                planned_vs_reactive_ratio: self.planned_vs_reactive_ratio,
                last_minute_requests_per_week: self.last_minute_requests_per_week,
                missed_deadlines_last_3_months: self.missed_deadlines_last_3_months,
                team_overtime: self.team_overtime,
                process_adherence_level: self.process_adherence_level,
            },
            client_risk: ClientRiskInput {
                stakeholder_accessibility: self.stakeholder_accessibility,
                feedback_tone: self.feedback_tone,
                response_time_to_requests: self.response_time_to_requests,
                scope_creep_behaviour: self.scope_creep_behaviour,
                payment_behaviour: self.payment_behaviour,
                recent_escalations: self.recent_escalations,
            },
        }
    }
}

pub async fn import_csv(store: &dyn AnalysisStore, csv_path: &Path) -> anyhow::Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for (index, result) in reader.deserialize::<AccountRow>().enumerate() {
        let line = index + 2; // header occupies line 1
        let row = result.with_context(|| format!("malformed row at line {line}"))?;
        let input = row.into_input();
        if let Err(violations) = input.validate() {
            let fields: Vec<String> = violations
                .iter()
                .map(|v| format!("{}: {}", v.field, v.message))
                .collect();
            bail!("invalid row at line {line}: {}", fields.join("; "));
        }

        let analysis = analysis::create_analysis(&input);
        store.save(&analysis).await?;
        inserted += 1;
    }

    Ok(inserted)
}
