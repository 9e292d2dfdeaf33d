use serde_json::Value;

pub const INVALID_INPUT_MESSAGE: &str = "ERROR: Invalid data format. Please try again.";

const REPORT_TITLE: &str = "**SCAMSHIELD ANALYSIS REPORT**";
const EPHEMERAL_NOTE: &str = "Note: Analysis is ephemeral. No data is stored or tracked.";

const BAR_CELLS: usize = 20;
const MAX_FINDINGS: usize = 6;
const MAX_STEPS: usize = 4;
const SEPARATOR_WIDTH: usize = 50;

// Severity markers are stripped from findings; the prose already carries
// the severity.
const STRIPPED_MARKERS: &[&str] = &["🚨", "⚠️", "✅"];

/// Renders the combiner's JSON into the fixed-structure report. This is the
/// one boundary that must never fail: malformed input becomes a fixed error
/// string, and missing optional fields are simply omitted.
pub fn render(json: &str) -> String {
    let Ok(data) = serde_json::from_str::<Value>(json) else {
        return INVALID_INPUT_MESSAGE.to_string();
    };
    render_value(&data)
}

fn render_value(data: &Value) -> String {
    let score = data
        .get("final_score")
        .and_then(Value::as_u64)
        .unwrap_or(0)
        .min(100);
    let verdict = str_field(data, "final_verdict", "UNKNOWN");
    let color = str_field(data, "color", "green");
    let risk_level = str_field(data, "risk_level", "Unknown Risk");
    let explanation = str_field(data, "explain_brief", "No explanation provided");

    let breakdown = data.get("breakdown");
    let heuristic = nested_u64(breakdown, "heuristic");
    let domain = nested_u64(breakdown, "domain");
    let llm = nested_u64(breakdown, "llm");

    let heuristic_flags = str_list(data, "heuristic_flags");
    let top_reasons = str_list(data, "top_reasons");
    let next_steps = str_list(data, "next_steps");

    let mut findings = Vec::new();
    for flag in heuristic_flags.iter().chain(top_reasons.iter()) {
        if !findings.contains(flag) {
            findings.push(flag.clone());
        }
    }

    let status_icon = match color {
        "green" => '✓',
        "yellow" => '⚠',
        "red" => '✕',
        _ => '•',
    };

    let filled = (score as usize * BAR_CELLS) / 100;
    let bar: String = "█".repeat(filled) + &"░".repeat(BAR_CELLS - filled);
    let separator = "─".repeat(SEPARATOR_WIDTH);

    let mut out = String::new();
    let mut line = |text: &str| {
        out.push_str(text);
        out.push_str("\n\n");
    };

    line(REPORT_TITLE);
    line(&format!("**Status:** {status_icon} {}", verdict.to_uppercase()));
    line(&format!("**Risk Level:** {risk_level}"));
    line(&format!("**Risk Score:** {score}/100"));
    line(&format!("[{bar}]"));

    if let Some(confidence) = data.get("confidence").and_then(Value::as_str) {
        line(&format!("**Analysis Confidence:** {confidence}"));
    }

    line(&separator);
    line("**ASSESSMENT**");
    line(explanation);
    line(&separator);

    line("**KEY FINDINGS**");
    if findings.is_empty() {
        line("No significant risk indicators detected.");
    } else {
        let mut list = String::new();
        for (i, flag) in findings.iter().take(MAX_FINDINGS).enumerate() {
            list.push_str(&format!("{}. {}\n", i + 1, strip_markers(flag)));
        }
        line(list.trim_end());
    }
    line(&separator);

    line("**RECOMMENDATIONS**");
    if next_steps.is_empty() {
        line("Proceed with standard verification.");
    } else {
        let mut list = String::new();
        for (i, step) in next_steps.iter().take(MAX_STEPS).enumerate() {
            list.push_str(&format!("{}. {}\n", i + 1, strip_markers(step)));
        }
        line(list.trim_end());
    }
    line(&separator);

    line("**ANALYSIS BREAKDOWN**");
    line(&format!("**Pattern Recognition:** {heuristic}/100"));
    line(&format!("**Domain Validation:** {domain}/100"));
    line(&format!("**AI Contextual Analysis:** {llm}/100"));

    if let Some(weights) = data.get("weights_used") {
        line("**Weighting Applied:**");
        line(&format!("• Pattern: {}%", weight_percent(weights, "h")));
        line(&format!("• Domain: {}%", weight_percent(weights, "d")));
        line(&format!("• AI: {}%", weight_percent(weights, "l")));
    }

    line(&separator);
    out.push_str(EPHEMERAL_NOTE);
    out.trim().to_string()
}

fn str_field<'a>(data: &'a Value, key: &str, fallback: &'a str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or(fallback)
}

fn str_list(data: &Value, key: &str) -> Vec<String> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn nested_u64(parent: Option<&Value>, key: &str) -> u64 {
    parent
        .and_then(|v| v.get(key))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

fn weight_percent(weights: &Value, key: &str) -> i64 {
    (weights.get(key).and_then(Value::as_f64).unwrap_or(0.0) * 100.0) as i64
}

fn strip_markers(text: &str) -> String {
    let mut out = text.to_string();
    for marker in STRIPPED_MARKERS {
        out = out.replace(marker, "");
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{combine, ContextReport, DomainReport, HeuristicReport};

    fn sample_verdict_json() -> String {
        let verdict = combine(
            &HeuristicReport {
                heuristic_score: 90,
                heuristic_flags: vec![
                    "🚨 CRITICAL: 'gift card' detected".to_string(),
                    "🚨 CRITICAL: 'send money' detected".to_string(),
                ],
            },
            &DomainReport {
                domain_score: 80,
                domain_flags: vec!["🚩 No official URL provided for application".to_string()],
            },
            &ContextReport {
                llm_score: 85,
                top_reasons: vec!["Payment demanded before joining".to_string()],
                explain_brief: "Advance-fee scam pattern".to_string(),
            },
        );
        serde_json::to_string(&verdict).unwrap()
    }

    #[test]
    fn test_invalid_json_never_raises() {
        assert_eq!(render("not json at all"), INVALID_INPUT_MESSAGE);
        assert_eq!(render("{\"final_score\":"), INVALID_INPUT_MESSAGE);
    }

    #[test]
    fn test_full_report_structure() {
        let report = render(&sample_verdict_json());
        assert!(report.starts_with(REPORT_TITLE));
        assert!(report.contains("**Status:** ✕ SCAM"));
        assert!(report.contains("**Risk Level:** High Risk"));
        assert!(report.contains("**Analysis Confidence:**"));
        assert!(report.contains("**KEY FINDINGS**"));
        assert!(report.contains("1. CRITICAL: 'gift card' detected"));
        assert!(report.contains("**Pattern Recognition:** 90/100"));
        assert!(report.contains("**Domain Validation:** 80/100"));
        assert!(report.contains("**AI Contextual Analysis:** 85/100"));
        assert!(report.contains("• Pattern: 50%"));
        assert!(report.ends_with(EPHEMERAL_NOTE));
    }

    #[test]
    fn test_markers_stripped_from_findings() {
        let report = render(&sample_verdict_json());
        assert!(!report.contains("🚨 CRITICAL"));
        assert!(report.contains("DO NOT ENGAGE"));
    }

    #[test]
    fn test_empty_object_renders_defaults() {
        let report = render("{}");
        assert!(report.contains("**Status:** ✓ UNKNOWN"));
        assert!(report.contains("**Risk Score:** 0/100"));
        assert!(report.contains("No significant risk indicators detected."));
        assert!(report.contains("Proceed with standard verification."));
        assert!(!report.contains("Analysis Confidence"));
        assert!(!report.contains("Weighting Applied"));
    }

    #[test]
    fn test_progress_bar_scales_with_score() {
        let report = render(r#"{"final_score": 50}"#);
        assert!(report.contains(&("█".repeat(10) + &"░".repeat(10))));
    }
}
