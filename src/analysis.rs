use chrono::Utc;
use uuid::Uuid;

use crate::models::{AccountInput, AnalysisResult};
use crate::{assessment, report, signals};

pub fn create_analysis(input: &AccountInput) -> AnalysisResult {
    let id = Uuid::new_v4();
    let analysis_date = Utc::now();

    let retainer = signals::evaluate_retainer_reality(&input.retainer_reality);
    let drift = signals::evaluate_delivery_drift(&input.delivery_drift);
    let client = signals::evaluate_client_risk(&input.client_risk);
    let overall = assessment::compose_overall(&retainer, &drift, &client);

    let markdown_report =
        report::render_report(input, &retainer, &drift, &client, &overall, analysis_date);

    AnalysisResult {
        id,
        account_name: input.account_name.clone(),
        analysis_date,
        retainer_reality_signal: retainer,
        delivery_drift_signal: drift,
        client_risk_signal: client,
        overall_assessment: overall,
        markdown_report,
    }
}
