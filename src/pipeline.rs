use anyhow::Result;

use crate::scoring::{combine, domain, heuristic, ContextScorer, FinalVerdict};

/// Fan-out/fan-in for one posting: the heuristic signal runs inline, the
/// domain and contextual signals run concurrently, and the combiner waits
/// for all three. Only a contextual-scorer failure can propagate.
pub async fn analyze<C: ContextScorer>(text: &str, scorer: &C) -> Result<FinalVerdict> {
    let heuristic_report = heuristic::score(text);
    let (domain_report, context_report) = tokio::join!(domain::score(text), scorer.score(text));
    let context_report = context_report?;

    Ok(combine(&heuristic_report, &domain_report, &context_report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ContextReport, FixedScorer, Verdict};

    #[tokio::test]
    async fn test_analyze_blends_all_three_signals() {
        // No URLs, so the domain stage stays offline.
        let scorer = FixedScorer(ContextReport {
            llm_score: 80,
            top_reasons: vec!["Payment demanded up front".to_string()],
            explain_brief: "Classic advance-fee pattern".to_string(),
        });
        let verdict = analyze(
            "Pay registration fee via Western Union to apply, contact on Telegram",
            &scorer,
        )
        .await
        .unwrap();

        assert_eq!(verdict.final_verdict, Verdict::Scam);
        assert_eq!(verdict.breakdown.llm, 80);
        assert!(verdict.breakdown.heuristic >= 60);
        assert!(verdict
            .all_flags
            .iter()
            .any(|f| f.contains("registration fee")));
        assert_eq!(verdict.explain_brief, "Classic advance-fee pattern");
    }

    #[tokio::test]
    async fn test_analyze_clean_text_is_safe() {
        let verdict = analyze(
            "Company: Acme Analytics. Position: Data Engineer. Location: Mumbai office. \
             Qualification: B.Tech. Details shared during the scheduled interview.",
            &FixedScorer::neutral(),
        )
        .await
        .unwrap();

        assert_eq!(verdict.final_verdict, Verdict::Safe);
        assert_eq!(verdict.breakdown.heuristic, 0);
    }
}
