pub mod combiner;
pub mod context;
pub mod domain;
pub mod heuristic;

pub use combiner::{
    combine, combine_json, select_weights, Confidence, FinalVerdict, RiskColor, ScoreBreakdown,
    Verdict, Weights, WEIGHTS_BALANCED, WEIGHTS_DOMAIN_HEAVY, WEIGHTS_PATTERN_HEAVY,
};
pub use context::{ContextReport, ContextScorer, FixedScorer, RemoteScorer};
pub use domain::{DomainReport, TRUSTED_PLATFORMS};
pub use heuristic::{HeuristicReport, CRITICAL_MARKER, CRITICAL_PATTERNS, HIGH_RISK_PATTERNS};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_scorer_drives_weighting_end_to_end() {
        let report = heuristic::score(
            "Pay registration fee via Western Union, guaranteed income ₹8000 daily",
        );
        assert!(report.heuristic_score >= 60);

        let verdict = combine(
            &report,
            &DomainReport {
                domain_score: 20,
                domain_flags: Vec::new(),
            },
            &ContextReport {
                llm_score: 30,
                ..Default::default()
            },
        );
        assert_eq!(verdict.weights_used, WEIGHTS_PATTERN_HEAVY);
        assert_eq!(verdict.breakdown.heuristic, report.heuristic_score);
    }

    #[test]
    fn test_score_records_survive_the_wire() {
        let heuristic_json =
            serde_json::to_string(&heuristic::score("urgent hiring, earn daily ₹9000")).unwrap();
        let domain_json = serde_json::to_string(&DomainReport {
            domain_score: 45,
            domain_flags: vec!["🚩 Generic email provider: gmail.com".to_string()],
        })
        .unwrap();
        let context_json = serde_json::to_string(&ContextReport {
            llm_score: 55,
            top_reasons: vec!["Vague role description".to_string()],
            explain_brief: "Several pressure tactics".to_string(),
        })
        .unwrap();

        let verdict = combine_json(&heuristic_json, &domain_json, &context_json).unwrap();
        assert_eq!(verdict.breakdown.domain, 45);
        assert_eq!(verdict.breakdown.llm, 55);
        assert!(verdict
            .all_flags
            .iter()
            .any(|f| f.contains("Generic email provider")));
    }
}
