use crate::models::{OverallAssessment, SignalLevel, SignalResult};

fn summary_for(level: SignalLevel) -> &'static str {
    match level {
        SignalLevel::Low => {
            "This account shows healthy operational patterns across all three signal dimensions. No immediate concerns require attention, though maintaining regular monitoring is advisable."
        }
        SignalLevel::Moderate => {
            "This account shows some areas of concern that merit attention. While not immediately critical, addressing these patterns now will prevent them from becoming structural issues."
        }
        SignalLevel::Elevated => {
            "This account displays significant operational stress across multiple dimensions. Leadership attention is recommended to address underlying issues before they escalate."
        }
        SignalLevel::High => {
            "This account requires immediate attention. Multiple high-risk signals indicate potential for relationship breakdown, team burnout, or financial loss if not addressed urgently."
        }
    }
}

// Blends level ordinals, not raw scores; score magnitude within a band is
// deliberately discarded.
pub fn compose_overall(
    retainer: &SignalResult,
    drift: &SignalResult,
    client: &SignalResult,
) -> OverallAssessment {
    let levels = [retainer.level, drift.level, client.level];
    let avg_level = levels.iter().map(|l| f64::from(l.ordinal())).sum::<f64>() / 3.0;
    let high_signals = levels.iter().filter(|l| **l == SignalLevel::High).count();
    let elevated_signals = levels
        .iter()
        .filter(|l| **l == SignalLevel::Elevated)
        .count();

    let level = if high_signals >= 2 || avg_level >= 2.5 {
        SignalLevel::High
    } else if high_signals >= 1 || elevated_signals >= 2 || avg_level >= 1.5 {
        SignalLevel::Elevated
    } else if elevated_signals >= 1 || avg_level >= 0.5 {
        SignalLevel::Moderate
    } else {
        SignalLevel::Low
    };

    // Fixed signal order decides what survives truncation.
    let mut key_findings = Vec::new();
    let mut priority_actions = Vec::new();
    for signal in [retainer, drift, client] {
        if signal.level != SignalLevel::Low {
            key_findings.extend(signal.factors.iter().take(2).cloned());
            priority_actions.extend(signal.recommendations.iter().take(1).cloned());
        }
    }
    key_findings.truncate(5);
    priority_actions.truncate(3);

    OverallAssessment {
        level,
        summary: summary_for(level).to_string(),
        key_findings,
        priority_actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(level: SignalLevel, factors: &[&str], recommendations: &[&str]) -> SignalResult {
        SignalResult {
            level,
            score: level.ordinal() as u32 * 25,
            explanation: "test".to_string(),
            factors: factors.iter().map(|s| s.to_string()).collect(),
            recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn quiet() -> SignalResult {
        signal(SignalLevel::Low, &[], &[])
    }

    #[test]
    fn all_low_blends_to_low_with_empty_lists() {
        let overall = compose_overall(&quiet(), &quiet(), &quiet());
        assert_eq!(overall.level, SignalLevel::Low);
        assert!(overall.key_findings.is_empty());
        assert!(overall.priority_actions.is_empty());
        assert_eq!(overall.summary, summary_for(SignalLevel::Low));
    }

    #[test]
    fn two_high_signals_force_high_regardless_of_third() {
        let high = signal(SignalLevel::High, &["f"], &["r"]);
        let overall = compose_overall(&high, &quiet(), &high);
        assert_eq!(overall.level, SignalLevel::High);
    }

    #[test]
    fn one_high_signal_blends_to_elevated() {
        let high = signal(SignalLevel::High, &["f"], &["r"]);
        let overall = compose_overall(&quiet(), &high, &quiet());
        assert_eq!(overall.level, SignalLevel::Elevated);
    }

    #[test]
    fn two_elevated_signals_blend_to_elevated() {
        let elevated = signal(SignalLevel::Elevated, &["f"], &["r"]);
        let overall = compose_overall(&elevated, &elevated, &quiet());
        assert_eq!(overall.level, SignalLevel::Elevated);
    }

    #[test]
    fn single_moderate_crosses_the_average_threshold() {
        // Ordinals 1, 1, 0 average to 2/3, past the 0.5 moderate line.
        let moderate = signal(SignalLevel::Moderate, &["f"], &["r"]);
        let overall = compose_overall(&moderate, &moderate, &quiet());
        assert_eq!(overall.level, SignalLevel::Moderate);

        // A lone elevated signal also lands on moderate.
        let elevated = signal(SignalLevel::Elevated, &["f"], &["r"]);
        let overall = compose_overall(&quiet(), &quiet(), &elevated);
        assert_eq!(overall.level, SignalLevel::Moderate);
    }

    #[test]
    fn three_moderates_blend_to_moderate_not_elevated() {
        let moderate = signal(SignalLevel::Moderate, &["f"], &["r"]);
        let overall = compose_overall(&moderate, &moderate, &moderate);
        assert_eq!(overall.level, SignalLevel::Moderate);
    }

    #[test]
    fn one_high_two_elevated_stays_elevated() {
        let high = signal(SignalLevel::High, &["f"], &["r"]);
        let elevated = signal(SignalLevel::Elevated, &["f"], &["r"]);
        // Avg 7/3 misses the 2.5 line and only one signal is high.
        let overall = compose_overall(&high, &elevated, &elevated);
        assert_eq!(overall.level, SignalLevel::Elevated);
    }

    #[test]
    fn findings_take_two_per_signal_in_fixed_order_capped_at_five() {
        let retainer = signal(
            SignalLevel::High,
            &["r1", "r2", "r3"],
            &["ra1", "ra2"],
        );
        let drift = signal(SignalLevel::Elevated, &["d1", "d2"], &["da1"]);
        let client = signal(SignalLevel::Moderate, &["c1", "c2"], &["ca1"]);

        let overall = compose_overall(&retainer, &drift, &client);
        assert_eq!(overall.key_findings, vec!["r1", "r2", "d1", "d2", "c1"]);
        assert_eq!(overall.priority_actions, vec!["ra1", "da1", "ca1"]);
    }

    #[test]
    fn low_signals_contribute_nothing_to_findings() {
        let noisy_low = signal(SignalLevel::Low, &["ignored"], &["ignored"]);
        let moderate = signal(SignalLevel::Moderate, &["m1"], &["ma1"]);
        let overall = compose_overall(&noisy_low, &moderate, &noisy_low);
        assert_eq!(overall.key_findings, vec!["m1"]);
        assert_eq!(overall.priority_actions, vec!["ma1"]);
    }

    #[test]
    fn caps_hold_for_every_level_combination() {
        let levels = [
            SignalLevel::Low,
            SignalLevel::Moderate,
            SignalLevel::Elevated,
            SignalLevel::High,
        ];
        let busy = |level| signal(level, &["a", "b", "c"], &["x", "y"]);
        for a in levels {
            for b in levels {
                for c in levels {
                    let overall = compose_overall(&busy(a), &busy(b), &busy(c));
                    assert!(overall.key_findings.len() <= 5);
                    assert!(overall.priority_actions.len() <= 3);
                }
            }
        }
    }
}
