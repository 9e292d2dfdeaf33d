use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Severity marker carried by flags the combiner counts as critical.
pub const CRITICAL_MARKER: char = '🚨';

/// Phrases that almost never appear in a legitimate posting.
pub const CRITICAL_PATTERNS: &[(&str, i32)] = &[
    ("registration fee", 35),
    ("processing fee", 35),
    ("security deposit", 35),
    ("pay for training", 35),
    ("investment required", 40),
    ("send money", 40),
    ("western union", 45),
    ("gift card", 45),
    ("bitcoin", 40),
    ("cryptocurrency", 40),
];

pub const HIGH_RISK_PATTERNS: &[(&str, i32)] = &[
    ("urgent hiring", 25),
    ("limited slots", 25),
    ("act fast", 25),
    ("immediate joining", 25),
    ("first come first serve", 25),
    ("telegram", 20),
    ("whatsapp only", 25),
    ("no experience needed", 15),
    ("work from home", 10),
    ("earn daily", 25),
    ("guaranteed income", 30),
    ("easy money", 30),
];

pub const GENERIC_EMAIL_PROVIDERS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "rediffmail.com",
];

const INFORMAL_TOKENS: &[&str] = &[
    "cant", "wont", "dont", "pls", "plz", "msg", "dm me", "inbox me",
];

const MANIPULATION_PHRASES: &[&str] = &[
    "amazing opportunity",
    "once in lifetime",
    "exclusive offer",
    "secret method",
    "financial freedom",
    "be your own boss",
    "passive income",
    "get rich",
];

// Keyword variants accepted as evidence that a required field is present.
const REQUIRED_FIELDS: &[(&str, &[&str])] = &[
    ("company name", &["company:", "organization:", "employer:"]),
    ("job title", &["position:", "role:", "job title:"]),
    ("location", &["location:", "city:", "office:"]),
    ("qualifications", &["qualification", "education", "degree"]),
];

const POINTS_DAILY_UNREALISTIC: i32 = 30;
const POINTS_DAILY_EXTREME: i32 = 40;
const POINTS_ANNUAL_EXCESSIVE: i32 = 25;
const POINTS_MULTIPLE_PHONES: i32 = 20;
const POINTS_INTERNATIONAL_PHONE: i32 = 30;
const POINTS_GENERIC_EMAIL: i32 = 15;
const POINTS_POOR_GRAMMAR: i32 = 15;
const POINTS_MISSING_FIELDS: i32 = 20;
const POINTS_MANIPULATION: i32 = 20;
const POINTS_CAPS_ABUSE: i32 = 15;

const DAILY_UNREALISTIC_THRESHOLD: i64 = 3_000;
const DAILY_EXTREME_THRESHOLD: i64 = 5_000;
const ANNUAL_EXCESSIVE_THRESHOLD: i64 = 5_000_000;
const PHONE_COUNT_THRESHOLD: usize = 2;
const INFORMAL_COUNT_THRESHOLD: usize = 2;
const MISSING_FIELDS_THRESHOLD: usize = 3;
const MANIPULATION_COUNT_THRESHOLD: usize = 2;
const CAPS_COUNT_THRESHOLD: usize = 5;
const CAPS_MIN_CHARS: usize = 3;

pub const MAX_SCORE: i32 = 100;
pub const MAX_FLAGS: usize = 10;

static DAILY_SALARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"₹?\s*(\d+(?:,\d+)*)\s*(?:daily|per day|/day)").unwrap());
static ANNUAL_SALARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"₹?\s*(\d+(?:,\d+)*)\s*(?:lpa|per annum|/year)").unwrap());
static DOMESTIC_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\+91|0)?[6-9]\d{9}").unwrap());
static INTERNATIONAL_PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+\d{8,}").unwrap());
static EMAIL_DOMAIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\w.-]+@([\w.-]+)").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicReport {
    #[serde(default)]
    pub heuristic_score: u8,
    #[serde(default)]
    pub heuristic_flags: Vec<String>,
}

/// Additive, non-exclusive checks over the lowercased text. Matching is
/// substring containment, so a phrase inside a longer word still counts.
pub fn score(text: &str) -> HeuristicReport {
    let lower = text.to_lowercase();
    let mut score = 0i32;
    let mut flags = Vec::new();

    for (pattern, points) in CRITICAL_PATTERNS {
        if lower.contains(pattern) {
            score += points;
            flags.push(format!("🚨 CRITICAL: '{pattern}' detected"));
        }
    }

    for (pattern, points) in HIGH_RISK_PATTERNS {
        if lower.contains(pattern) {
            score += points;
            flags.push(format!("⚠️ High Risk: '{pattern}'"));
        }
    }

    // Both daily thresholds are checked independently; an amount over the
    // extreme threshold earns both deltas and both flags.
    for caps in DAILY_SALARY.captures_iter(&lower) {
        let amount = parse_amount(&caps[1]);
        if amount > DAILY_UNREALISTIC_THRESHOLD {
            score += POINTS_DAILY_UNREALISTIC;
            flags.push(format!(
                "💰 Unrealistic daily salary: ₹{}/day",
                group_thousands(amount)
            ));
        }
        if amount > DAILY_EXTREME_THRESHOLD {
            score += POINTS_DAILY_EXTREME;
            flags.push(format!(
                "🚨 EXTREME: ₹{}/day (impossible)",
                group_thousands(amount)
            ));
        }
    }

    for caps in ANNUAL_SALARY.captures_iter(&lower) {
        let amount = parse_amount(&caps[1]);
        if amount > ANNUAL_EXCESSIVE_THRESHOLD {
            score += POINTS_ANNUAL_EXCESSIVE;
            flags.push(format!(
                "⚠️ Extremely high salary: ₹{} LPA",
                group_thousands(amount)
            ));
        }
    }

    let phone_count = DOMESTIC_PHONE.find_iter(&lower).count();
    if phone_count > PHONE_COUNT_THRESHOLD {
        score += POINTS_MULTIPLE_PHONES;
        flags.push(format!("📱 Multiple phone numbers ({phone_count})"));
    }

    // +91 prefixes are domestic; any other international prefix is flagged
    // once, regardless of how many numbers matched.
    let has_international = INTERNATIONAL_PHONE
        .find_iter(&lower)
        .any(|m| !m.as_str().starts_with("+91"));
    if has_international {
        score += POINTS_INTERNATIONAL_PHONE;
        flags.push("🌍 International phone number detected".to_string());
    }

    for caps in EMAIL_DOMAIN.captures_iter(&lower) {
        let domain = &caps[1];
        if GENERIC_EMAIL_PROVIDERS.contains(&domain) {
            score += POINTS_GENERIC_EMAIL;
            flags.push(format!("📧 Generic email domain: {domain}"));
        }
    }

    let informal_count = INFORMAL_TOKENS
        .iter()
        .filter(|token| lower.contains(*token))
        .count();
    if informal_count >= INFORMAL_COUNT_THRESHOLD {
        score += POINTS_POOR_GRAMMAR;
        flags.push(format!("✍️ Poor grammar/spelling ({informal_count} issues)"));
    }

    let missing_count = REQUIRED_FIELDS
        .iter()
        .filter(|(_, keywords)| !keywords.iter().any(|keyword| lower.contains(keyword)))
        .count();
    if missing_count >= MISSING_FIELDS_THRESHOLD {
        score += POINTS_MISSING_FIELDS;
        flags.push(format!("📋 Missing {missing_count} critical details"));
    }

    let manipulation_count = MANIPULATION_PHRASES
        .iter()
        .filter(|phrase| lower.contains(*phrase))
        .count();
    if manipulation_count >= MANIPULATION_COUNT_THRESHOLD {
        score += POINTS_MANIPULATION;
        flags.push("🎭 Emotional manipulation tactics detected".to_string());
    }

    // Evaluated against the raw text; lowercasing erases the signal.
    let caps_count = text.split_whitespace().filter(|w| is_shouted(w)).count();
    if caps_count > CAPS_COUNT_THRESHOLD {
        score += POINTS_CAPS_ABUSE;
        flags.push(format!("📢 Excessive CAPS ({caps_count} words)"));
    }

    // Upper cap only; no lower clamp is applied here.
    flags.truncate(MAX_FLAGS);
    HeuristicReport {
        heuristic_score: score.min(MAX_SCORE) as u8,
        heuristic_flags: flags,
    }
}

fn parse_amount(raw: &str) -> i64 {
    // Digit runs too long for i64 are certainly above every threshold.
    raw.replace(',', "").parse().unwrap_or(i64::MAX)
}

fn is_shouted(word: &str) -> bool {
    word.chars().count() > CAPS_MIN_CHARS
        && word.chars().any(|c| c.is_alphabetic())
        && !word.chars().any(|c| c.is_lowercase())
}

fn group_thousands(amount: i64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCAM_TEXT: &str = "Pay registration fee of ₹5000 via Western Union, \
        contact on Telegram only, guaranteed income ₹8000 daily, dm me";

    #[test]
    fn test_clean_posting_scores_zero() {
        let report = score(
            "Company: Acme Analytics. Position: Software Engineer. \
             Location: Pune office. Qualification: B.Tech required. \
             Salary: ₹30,000 per month. Interviews held at our registered address.",
        );
        assert_eq!(report.heuristic_score, 0);
        assert!(report.heuristic_flags.is_empty());
    }

    #[test]
    fn test_obvious_scam_clamps_to_max() {
        let report = score(SCAM_TEXT);
        assert_eq!(report.heuristic_score, 100);

        for expected in [
            "registration fee",
            "western union",
            "telegram",
            "guaranteed income",
        ] {
            assert!(
                report
                    .heuristic_flags
                    .iter()
                    .any(|f| f.contains(expected)),
                "missing flag for '{expected}'"
            );
        }
    }

    #[test]
    fn test_daily_salary_thresholds_fire_independently() {
        let moderate = score("Earn ₹4,000 per day working with us");
        assert!(moderate
            .heuristic_flags
            .iter()
            .any(|f| f.contains("Unrealistic daily salary")));
        assert!(!moderate.heuristic_flags.iter().any(|f| f.contains("EXTREME")));
        assert_eq!(moderate.heuristic_score, POINTS_DAILY_UNREALISTIC as u8 + 20);

        let extreme = score(SCAM_TEXT);
        assert!(extreme
            .heuristic_flags
            .iter()
            .any(|f| f.contains("Unrealistic daily salary: ₹8,000/day")));
        assert!(extreme
            .heuristic_flags
            .iter()
            .any(|f| f.contains("EXTREME: ₹8,000/day")));
    }

    #[test]
    fn test_annual_salary_check() {
        let report = score("CTC up to ₹60,00,000 per annum for freshers");
        assert!(report
            .heuristic_flags
            .iter()
            .any(|f| f.contains("Extremely high salary")));
    }

    #[test]
    fn test_phone_number_density() {
        let report = score("Call 9876543210 or 9123456780 or 9988776655 now");
        assert!(report
            .heuristic_flags
            .iter()
            .any(|f| f.contains("Multiple phone numbers (3)")));
    }

    #[test]
    fn test_international_phone_flagged_once() {
        let report = score("Reach us at +4479111234567 or +4479111234568");
        let intl_flags = report
            .heuristic_flags
            .iter()
            .filter(|f| f.contains("International phone"))
            .count();
        assert_eq!(intl_flags, 1);

        let domestic = score("Reach us at +919876543210");
        assert!(!domestic
            .heuristic_flags
            .iter()
            .any(|f| f.contains("International phone")));
    }

    #[test]
    fn test_generic_email_scored_per_occurrence() {
        let report = score("Send CV to hr.jobs@gmail.com or backup@yahoo.com");
        let email_flags = report
            .heuristic_flags
            .iter()
            .filter(|f| f.contains("Generic email domain"))
            .count();
        assert_eq!(email_flags, 2);
    }

    #[test]
    fn test_informal_language_threshold() {
        let single = score("dm me for details. Company: X. Position: Y. Location: Z. Degree needed.");
        assert!(!single
            .heuristic_flags
            .iter()
            .any(|f| f.contains("Poor grammar")));

        let double = score("pls dm me for details");
        assert!(double
            .heuristic_flags
            .iter()
            .any(|f| f.contains("Poor grammar/spelling (2 issues)")));
    }

    #[test]
    fn test_missing_fields_check() {
        let report = score("Great opening, message us to know more");
        assert!(report
            .heuristic_flags
            .iter()
            .any(|f| f.contains("Missing 4 critical details")));
    }

    #[test]
    fn test_manipulation_language() {
        let report = score("Amazing opportunity for financial freedom, join today");
        assert!(report
            .heuristic_flags
            .iter()
            .any(|f| f.contains("manipulation")));
    }

    #[test]
    fn test_caps_abuse_uses_raw_text() {
        let shouty =
            "HURRY LIMITED OPENINGS AVAILABLE TODAY APPLY IMMEDIATELY FRIENDS and join us";
        let report = score(shouty);
        assert!(report
            .heuristic_flags
            .iter()
            .any(|f| f.contains("Excessive CAPS (8 words)")));
    }

    #[test]
    fn test_flags_capped_at_ten_critical_first() {
        let everything = "registration fee processing fee security deposit pay for training \
            investment required send money western union gift card bitcoin cryptocurrency \
            telegram easy money urgent hiring";
        let report = score(everything);
        assert_eq!(report.heuristic_flags.len(), MAX_FLAGS);
        assert!(report.heuristic_flags.iter().all(|f| f.contains("CRITICAL")));
        assert_eq!(report.heuristic_score, 100);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(800), "800");
        assert_eq!(group_thousands(8000), "8,000");
        assert_eq!(group_thousands(5000000), "5,000,000");
    }

    #[test]
    fn test_round_trip() {
        let report = score(SCAM_TEXT);
        let json = serde_json::to_string(&report).unwrap();
        let parsed: HeuristicReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
