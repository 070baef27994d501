use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{AccountInput, OverallAssessment, SignalResult};

const DISCLAIMER: &str = "*This diagnostic report was generated by Agency Signals. It represents a point-in-time assessment based on the data provided and should be used alongside professional judgment and direct client knowledge.*";

pub fn render_report(
    input: &AccountInput,
    retainer: &SignalResult,
    drift: &SignalResult,
    client: &SignalResult,
    overall: &OverallAssessment,
    analysis_date: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Account Diagnostic Report: {}", input.account_name);
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "**Analysis Date:** {}",
        analysis_date.format("%B %-d, %Y")
    );
    let _ = writeln!(output);

    if let Some(industry) = &input.client_industry {
        let _ = writeln!(output, "**Industry:** {industry}");
    }
    let _ = writeln!(output, "**Account Tenure:** {}", input.account_tenure.as_str());
    let _ = writeln!(output, "**Team Size:** {} people", input.team_size);
    let _ = writeln!(output);

    let _ = writeln!(output, "---");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overall Assessment: {}", overall.level.label());
    let _ = writeln!(output);
    let _ = writeln!(output, "{}", overall.summary);
    let _ = writeln!(output);

    if !overall.key_findings.is_empty() {
        let _ = writeln!(output, "### Key Findings");
        let _ = writeln!(output);
        for finding in &overall.key_findings {
            let _ = writeln!(output, "- {finding}");
        }
        let _ = writeln!(output);
    }

    if !overall.priority_actions.is_empty() {
        let _ = writeln!(output, "### Priority Actions");
        let _ = writeln!(output);
        for (index, action) in overall.priority_actions.iter().enumerate() {
            let _ = writeln!(output, "{}. {action}", index + 1);
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "---");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Signal Analysis");
    let _ = writeln!(output);

    let sections = [
        ("Retainer Reality Index", retainer),
        ("Delivery Drift Signal", drift),
        ("Client Risk Signal", client),
    ];
    for (name, signal) in sections {
        let _ = writeln!(output, "### {name}: {}", signal.level.label());
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", signal.explanation);
        let _ = writeln!(output);

        if !signal.factors.is_empty() {
            let _ = writeln!(output, "**Contributing Factors:**");
            for factor in &signal.factors {
                let _ = writeln!(output, "- {factor}");
            }
            let _ = writeln!(output);
        }
        if !signal.recommendations.is_empty() {
            let _ = writeln!(output, "**Recommendations:**");
            for recommendation in &signal.recommendations {
                let _ = writeln!(output, "- {recommendation}");
            }
            let _ = writeln!(output);
        }
    }

    let _ = writeln!(output, "---");
    let _ = writeln!(output);
    let _ = writeln!(output, "{DISCLAIMER}");

    output
}
