use crate::models::{
    ClientRiskInput, DeliveryDriftInput, FeedbackTone, OvertimeLevel, PaymentBehaviour,
    ProcessAdherence, ResponseTime, RetainerRealityInput, ScopeCreep, SeniorInvolvement,
    SignalLevel, SignalResult, StakeholderAccess,
};

// Shared across all three evaluators; the cut points are policy, not tuning.
pub fn score_to_level(score: u32) -> SignalLevel {
    match score {
        60.. => SignalLevel::High,
        40..=59 => SignalLevel::Elevated,
        20..=39 => SignalLevel::Moderate,
        _ => SignalLevel::Low,
    }
}

fn senior_involvement_weight(frequency: SeniorInvolvement) -> u32 {
    match frequency {
        SeniorInvolvement::Rarely => 0,
        SeniorInvolvement::Occasionally => 10,
        SeniorInvolvement::Frequently => 25,
        SeniorInvolvement::Constantly => 40,
    }
}

fn overtime_weight(level: OvertimeLevel) -> u32 {
    match level {
        OvertimeLevel::None => 0,
        OvertimeLevel::Occasional => 5,
        OvertimeLevel::Regular => 20,
        OvertimeLevel::Constant => 35,
    }
}

fn process_adherence_weight(level: ProcessAdherence) -> u32 {
    match level {
        ProcessAdherence::Strong => 0,
        ProcessAdherence::Moderate => 5,
        ProcessAdherence::Weak => 15,
        ProcessAdherence::Absent => 25,
    }
}

fn accessibility_weight(level: StakeholderAccess) -> u32 {
    match level {
        StakeholderAccess::Excellent => 0,
        StakeholderAccess::Good => 5,
        StakeholderAccess::Limited => 20,
        StakeholderAccess::Poor => 35,
    }
}

fn feedback_tone_weight(tone: FeedbackTone) -> u32 {
    match tone {
        FeedbackTone::Positive => 0,
        FeedbackTone::Neutral => 5,
        FeedbackTone::Mixed => 20,
        FeedbackTone::Negative => 40,
    }
}

fn response_time_weight(time: ResponseTime) -> u32 {
    match time {
        ResponseTime::Fast => 0,
        ResponseTime::Normal => 0,
        ResponseTime::Slow => 10,
        ResponseTime::VerySlow => 20,
    }
}

fn scope_creep_weight(behaviour: ScopeCreep) -> u32 {
    match behaviour {
        ScopeCreep::None => 0,
        ScopeCreep::Occasional => 5,
        ScopeCreep::Frequent => 15,
        ScopeCreep::Constant => 25,
    }
}

fn payment_weight(behaviour: PaymentBehaviour) -> u32 {
    match behaviour {
        PaymentBehaviour::Early => 0,
        PaymentBehaviour::OnTime => 0,
        PaymentBehaviour::Delayed => 15,
        PaymentBehaviour::VeryDelayed => 30,
    }
}

fn retainer_explanation(level: SignalLevel) -> &'static str {
    match level {
        SignalLevel::Low => {
            "Commercial structure appears well-aligned with delivery reality. Scoping is appropriate and exceptions are managed effectively."
        }
        SignalLevel::Moderate => {
            "Some misalignment detected between retainer scope and actual delivery. Worth monitoring but not immediately concerning."
        }
        SignalLevel::Elevated => {
            "Significant gap between commercial terms and delivery reality. Structural review recommended within the next quarter."
        }
        SignalLevel::High => {
            "Critical misalignment between retainer and delivery. This account may be operating at a loss or unsustainable margin. Immediate review recommended."
        }
    }
}

fn drift_explanation(level: SignalLevel) -> &'static str {
    match level {
        SignalLevel::Low => {
            "Delivery remains largely planned and proactive. The team is operating with healthy capacity and process discipline."
        }
        SignalLevel::Moderate => {
            "Some drift toward reactive delivery patterns. Not yet critical but worth addressing before it becomes structural."
        }
        SignalLevel::Elevated => {
            "Significant delivery drift detected. The account has moved from planned delivery into firefighting mode. Intervention recommended."
        }
        SignalLevel::High => {
            "Delivery has shifted predominantly to reactive mode. This pattern is unsustainable and risks team burnout and quality issues. Immediate action required."
        }
    }
}

fn client_risk_explanation(level: SignalLevel) -> &'static str {
    match level {
        SignalLevel::Low => {
            "Client relationship appears healthy and stable. Good engagement, clear communication, and appropriate boundaries in place."
        }
        SignalLevel::Moderate => {
            "Some relationship friction points detected. Worth addressing proactively to prevent escalation."
        }
        SignalLevel::Elevated => {
            "Multiple risk indicators present. This relationship requires attention to prevent deterioration or potential churn."
        }
        SignalLevel::High => {
            "Significant client risk identified. This account shows multiple warning signs that require immediate leadership attention."
        }
    }
}

fn finish(
    score: u32,
    explain: fn(SignalLevel) -> &'static str,
    factors: Vec<String>,
    recommendations: Vec<String>,
) -> SignalResult {
    let score = score.min(100);
    let level = score_to_level(score);
    SignalResult {
        level,
        score,
        explanation: explain(level).to_string(),
        factors,
        recommendations,
    }
}

pub fn evaluate_retainer_reality(input: &RetainerRealityInput) -> SignalResult {
    let mut score = 0u32;
    let mut factors = Vec::new();
    let mut recommendations = Vec::new();

    // Ratio is defined as 1 when nothing is scoped.
    let hours_ratio = if input.scoped_hours_per_month > 0.0 {
        input.actual_hours_delivered / input.scoped_hours_per_month
    } else {
        1.0
    };

    if hours_ratio > 1.3 {
        score += 30;
        factors.push(format!(
            "Actual hours exceed scoped hours by {}%",
            ((hours_ratio - 1.0) * 100.0).round() as i64
        ));
        recommendations.push(
            "Review scope documentation and consider formal change request process".to_string(),
        );
    } else if hours_ratio > 1.15 {
        score += 15;
        factors.push("Moderate overdelivery pattern detected".to_string());
    }

    score += senior_involvement_weight(input.senior_involvement_frequency);
    if matches!(
        input.senior_involvement_frequency,
        SeniorInvolvement::Frequently | SeniorInvolvement::Constantly
    ) {
        factors.push("Senior staff involvement exceeds strategic oversight level".to_string());
        recommendations.push("Evaluate team capability gaps or scope complexity mismatch".to_string());
    }

    if input.scope_change_requests > 5 {
        score += 25;
        factors.push(format!(
            "{} scope changes in last quarter indicates fluid requirements",
            input.scope_change_requests
        ));
        recommendations.push("Implement quarterly scope review sessions with client".to_string());
    } else if input.scope_change_requests > 2 {
        score += 10;
        factors.push("Moderate scope change frequency".to_string());
    }

    if input.exception_handling_normalized {
        score += 20;
        factors.push("Exception handling has become normalized delivery pattern".to_string());
        recommendations
            .push("Formalize out-of-scope request process with clear boundaries".to_string());
    }

    finish(score, retainer_explanation, factors, recommendations)
}

pub fn evaluate_delivery_drift(input: &DeliveryDriftInput) -> SignalResult {
    let mut score = 0u32;
    let mut factors = Vec::new();
    let mut recommendations = Vec::new();

    if input.planned_vs_reactive_ratio < 50.0 {
        score += 35;
        factors.push(format!(
            "Only {}% of time on planned work indicates reactive mode",
            input.planned_vs_reactive_ratio
        ));
        recommendations
            .push("Implement buffer time in planning and review request prioritization".to_string());
    } else if input.planned_vs_reactive_ratio < 70.0 {
        score += 20;
        factors.push("Reactive work consuming significant portion of capacity".to_string());
    }

    if input.last_minute_requests_per_week > 5.0 {
        score += 25;
        factors.push(format!(
            "{} last-minute requests weekly disrupts delivery rhythm",
            input.last_minute_requests_per_week
        ));
        recommendations.push("Establish clear request SLAs with client stakeholder".to_string());
    } else if input.last_minute_requests_per_week > 2.0 {
        score += 10;
        factors.push("Regular last-minute requests affecting planning".to_string());
    }

    if input.missed_deadlines_last_3_months > 3 {
        score += 25;
        factors.push(format!(
            "{} missed deadlines suggests capacity or planning issues",
            input.missed_deadlines_last_3_months
        ));
        recommendations.push("Review estimation practices and capacity allocation".to_string());
    } else if input.missed_deadlines_last_3_months > 1 {
        score += 10;
        factors.push("Some internal deadline slippage noted".to_string());
    }

    score += overtime_weight(input.team_overtime);
    if matches!(
        input.team_overtime,
        OvertimeLevel::Regular | OvertimeLevel::Constant
    ) {
        factors.push("Team overtime pattern indicates sustained capacity pressure".to_string());
        recommendations.push("Assess workload distribution and resource allocation".to_string());
    }

    score += process_adherence_weight(input.process_adherence_level);
    if matches!(
        input.process_adherence_level,
        ProcessAdherence::Weak | ProcessAdherence::Absent
    ) {
        factors.push("Process discipline has eroded, increasing risk of errors and rework".to_string());
        recommendations.push("Reinforce core delivery processes before they degrade further".to_string());
    }

    finish(score, drift_explanation, factors, recommendations)
}

pub fn evaluate_client_risk(input: &ClientRiskInput) -> SignalResult {
    let mut score = 0u32;
    let mut factors = Vec::new();
    let mut recommendations = Vec::new();

    score += accessibility_weight(input.stakeholder_accessibility);
    if matches!(
        input.stakeholder_accessibility,
        StakeholderAccess::Limited | StakeholderAccess::Poor
    ) {
        factors.push(
            "Limited stakeholder access creates decision bottlenecks and misalignment risk"
                .to_string(),
        );
        recommendations
            .push("Request regular check-in cadence or escalation path clarification".to_string());
    }

    score += feedback_tone_weight(input.feedback_tone);
    match input.feedback_tone {
        FeedbackTone::Mixed => {
            factors.push(
                "Mixed feedback signals potential dissatisfaction that hasn't crystallized"
                    .to_string(),
            );
            recommendations.push(
                "Schedule candid relationship review to surface underlying concerns".to_string(),
            );
        }
        FeedbackTone::Negative => {
            factors.push("Negative feedback pattern indicates relationship stress".to_string());
            recommendations
                .push("Prioritize relationship repair and expectation realignment".to_string());
        }
        _ => {}
    }

    score += response_time_weight(input.response_time_to_requests);
    if matches!(
        input.response_time_to_requests,
        ResponseTime::Slow | ResponseTime::VerySlow
    ) {
        factors.push(
            "Slow client response times may indicate disengagement or internal issues".to_string(),
        );
    }

    score += scope_creep_weight(input.scope_creep_behaviour);
    if matches!(
        input.scope_creep_behaviour,
        ScopeCreep::Frequent | ScopeCreep::Constant
    ) {
        factors.push(
            "Persistent scope creep suggests unclear boundaries or unrealistic expectations"
                .to_string(),
        );
        recommendations.push(
            "Clarify scope boundaries in writing and implement change request process".to_string(),
        );
    }

    score += payment_weight(input.payment_behaviour);
    if matches!(
        input.payment_behaviour,
        PaymentBehaviour::Delayed | PaymentBehaviour::VeryDelayed
    ) {
        factors.push("Payment delays may indicate budget issues or relationship problems".to_string());
        recommendations
            .push("Address payment terms directly and assess client financial stability".to_string());
    }

    if input.recent_escalations > 2 {
        score += 25;
        factors.push(format!(
            "{} recent escalations indicates relationship instability",
            input.recent_escalations
        ));
        recommendations
            .push("Conduct relationship review and address root causes of escalations".to_string());
    } else if input.recent_escalations > 0 {
        score += 10;
        factors.push("Some escalation activity in recent period".to_string());
    }

    finish(score, client_risk_explanation, factors, recommendations)
}
