use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::Display;

use super::context::ContextReport;
use super::domain::DomainReport;
use super::heuristic::{HeuristicReport, CRITICAL_MARKER};

/// Trust the pattern scorer when it found obvious scam markers.
pub const WEIGHTS_PATTERN_HEAVY: Weights = Weights {
    h: 0.50,
    d: 0.25,
    l: 0.25,
};
/// Trust the domain check when it reports serious URL trouble.
pub const WEIGHTS_DOMAIN_HEAVY: Weights = Weights {
    h: 0.25,
    d: 0.50,
    l: 0.25,
};
/// Default blend, leaning on the contextual signal.
pub const WEIGHTS_BALANCED: Weights = Weights {
    h: 0.30,
    d: 0.30,
    l: 0.40,
};

const CRITICAL_FLAGS_MIN: usize = 2;
const DOMAIN_TRUST_THRESHOLD: u8 = 70;

const SPREAD_HIGH_MAX: i32 = 20;
const SPREAD_MEDIUM_MAX: i32 = 40;

const SAFE_CEILING: u8 = 25;
const SUSPICIOUS_CEILING: u8 = 60;

const MAX_COMBINED_FLAGS: usize = 8;

pub const NEXT_STEPS_SAFE: &[&str] = &[
    "✅ Verify company on official website",
    "✅ Read employee reviews on Glassdoor",
    "✅ Check if job is on company's career page",
    "✅ Proceed with standard application",
];

pub const NEXT_STEPS_SUSPICIOUS: &[&str] = &[
    "⚠️ DO NOT share personal documents yet",
    "⚠️ Verify company registration (MCA database)",
    "⚠️ Request interview on official platform",
    "⚠️ Ask for official company email",
    "⚠️ Check company address on Google Maps",
];

pub const NEXT_STEPS_SCAM: &[&str] = &[
    "🚨 DO NOT ENGAGE with this posting",
    "🚨 DO NOT send money or documents",
    "🚨 Report to cybercrime.gov.in",
    "🚨 Block contact immediately",
    "🚨 Warn others in your network",
];

/// Always one of the three presets, never interpolated; each sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub h: f64,
    pub d: f64,
    pub l: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.h + self.d + self.l
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Verdict {
    #[serde(rename = "SAFE")]
    #[strum(serialize = "SAFE")]
    Safe,
    #[serde(rename = "SUSPICIOUS")]
    #[strum(serialize = "SUSPICIOUS")]
    Suspicious,
    #[serde(rename = "SCAM")]
    #[strum(serialize = "SCAM")]
    Scam,
}

impl Verdict {
    /// Bands are inclusive on their ceiling; the next band starts above it.
    pub fn from_score(score: u8) -> Self {
        if score <= SAFE_CEILING {
            Verdict::Safe
        } else if score <= SUSPICIOUS_CEILING {
            Verdict::Suspicious
        } else {
            Verdict::Scam
        }
    }

    pub fn risk_level(&self) -> &'static str {
        match self {
            Verdict::Safe => "Low Risk",
            Verdict::Suspicious => "Medium Risk",
            Verdict::Scam => "High Risk",
        }
    }

    pub fn color(&self) -> RiskColor {
        match self {
            Verdict::Safe => RiskColor::Green,
            Verdict::Suspicious => RiskColor::Yellow,
            Verdict::Scam => RiskColor::Red,
        }
    }

    pub fn next_steps(&self) -> &'static [&'static str] {
        match self {
            Verdict::Safe => NEXT_STEPS_SAFE,
            Verdict::Suspicious => NEXT_STEPS_SUSPICIOUS,
            Verdict::Scam => NEXT_STEPS_SCAM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum RiskColor {
    #[serde(rename = "green")]
    #[strum(serialize = "green")]
    Green,
    #[serde(rename = "yellow")]
    #[strum(serialize = "yellow")]
    Yellow,
    #[serde(rename = "red")]
    #[strum(serialize = "red")]
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_spread(spread: i32) -> Self {
        if spread < SPREAD_HIGH_MAX {
            Confidence::High
        } else if spread < SPREAD_MEDIUM_MAX {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub heuristic: u8,
    pub domain: u8,
    pub llm: u8,
}

/// Derived entirely from the three input records; no hidden state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalVerdict {
    pub final_score: u8,
    pub final_verdict: Verdict,
    pub risk_level: String,
    pub color: RiskColor,
    pub confidence: Confidence,
    pub breakdown: ScoreBreakdown,
    pub weights_used: Weights,
    pub heuristic_flags: Vec<String>,
    pub domain_flags: Vec<String>,
    pub top_reasons: Vec<String>,
    pub explain_brief: String,
    pub next_steps: Vec<String>,
    pub all_flags: Vec<String>,
}

/// First matching rule wins.
pub fn select_weights(critical_flags: usize, domain_score: u8) -> Weights {
    if critical_flags >= CRITICAL_FLAGS_MIN {
        WEIGHTS_PATTERN_HEAVY
    } else if domain_score > DOMAIN_TRUST_THRESHOLD {
        WEIGHTS_DOMAIN_HEAVY
    } else {
        WEIGHTS_BALANCED
    }
}

pub fn combine(
    heuristic: &HeuristicReport,
    domain: &DomainReport,
    context: &ContextReport,
) -> FinalVerdict {
    let critical_flags = heuristic
        .heuristic_flags
        .iter()
        .filter(|flag| flag.contains(CRITICAL_MARKER))
        .count();
    let weights = select_weights(critical_flags, domain.domain_score);

    let final_score = (f64::from(heuristic.heuristic_score) * weights.h
        + f64::from(domain.domain_score) * weights.d
        + f64::from(context.llm_score) * weights.l)
        .round() as u8;

    let scores = [
        heuristic.heuristic_score,
        domain.domain_score,
        context.llm_score,
    ];
    let spread = i32::from(scores.iter().copied().max().unwrap_or(0))
        - i32::from(scores.iter().copied().min().unwrap_or(0));

    let verdict = Verdict::from_score(final_score);

    let all_flags = dedup_flags([
        heuristic.heuristic_flags.as_slice(),
        domain.domain_flags.as_slice(),
        context.top_reasons.as_slice(),
    ]);

    FinalVerdict {
        final_score,
        final_verdict: verdict,
        risk_level: verdict.risk_level().to_string(),
        color: verdict.color(),
        confidence: Confidence::from_spread(spread),
        breakdown: ScoreBreakdown {
            heuristic: heuristic.heuristic_score,
            domain: domain.domain_score,
            llm: context.llm_score,
        },
        weights_used: weights,
        heuristic_flags: heuristic.heuristic_flags.clone(),
        domain_flags: domain.domain_flags.clone(),
        top_reasons: context.top_reasons.clone(),
        explain_brief: context.explain_brief.clone(),
        next_steps: verdict
            .next_steps()
            .iter()
            .map(|step| step.to_string())
            .collect(),
        all_flags,
    }
}

/// Malformed upstream JSON surfaces as an error here; this is the one stage
/// that must not degrade silently before reporting.
pub fn combine_json(heuristic: &str, domain: &str, context: &str) -> Result<FinalVerdict> {
    let heuristic: HeuristicReport = serde_json::from_str(heuristic)?;
    let domain: DomainReport = serde_json::from_str(domain)?;
    let context: ContextReport = serde_json::from_str(context)?;
    Ok(combine(&heuristic, &domain, &context))
}

// First-seen order keeps the surviving flags deterministic.
fn dedup_flags(groups: [&[String]; 3]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut flags = Vec::new();
    for flag in groups.into_iter().flatten() {
        if flags.len() == MAX_COMBINED_FLAGS {
            break;
        }
        if seen.insert(flag.as_str()) {
            flags.push(flag.clone());
        }
    }
    flags
}
