use anyhow::Result;
use regex::Regex;
use reqwest::redirect;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::debug;

use super::heuristic::GENERIC_EMAIL_PROVIDERS;

// Job platforms whose hosts count as verifiable channels.
pub const TRUSTED_PLATFORMS: &[&str] = &[
    "linkedin.com",
    "naukri.com",
    "indeed.com",
    "internshala.com",
    "shine.com",
    "monster.com",
    "glassdoor.com",
    "foundit.in",
    "apna.co",
    "hirist.com",
    "freshersworld.com",
];

const JOB_PAGE_KEYWORDS: &[&str] = &[
    "salary",
    "requirements",
    "qualifications",
    "experience",
    "apply now",
    "job description",
];

const PAGE_SCAM_INDICATORS: &[&str] = &[
    "registration fee",
    "processing fee",
    "security deposit",
    "immediate joining",
    "urgent hiring",
    "limited slots",
];

const APPLICATION_KEYWORDS: &[&str] = &["apply", "job", "hiring", "position"];
const MESSAGING_APPS: &[&str] = &["whatsapp", "telegram"];

const POINTS_GENERIC_EMAIL: i32 = 20;
const POINTS_CORPORATE_EMAIL: i32 = -10;
const POINTS_NOT_FOUND: i32 = 40;
const POINTS_BAD_STATUS: i32 = 20;
const POINTS_HTTPS: i32 = -5;
const POINTS_NO_HTTPS: i32 = 15;
const POINTS_TRUSTED_PLATFORM: i32 = -30;
const POINTS_UNKNOWN_PLATFORM: i32 = 15;
const POINTS_JOB_META_TAG: i32 = -15;
const POINTS_JOB_SCHEMA: i32 = -10;
const POINTS_JOB_KEYWORDS_PRESENT: i32 = -10;
const POINTS_JOB_KEYWORDS_MISSING: i32 = 10;
const POINTS_SCAM_CONTENT: i32 = 20;
const POINTS_REDIRECT_CHAIN: i32 = 15;
const POINTS_NO_APPLICATION_URL: i32 = 25;
const POINTS_MESSAGING_RECRUITMENT: i32 = 30;

const JOB_KEYWORDS_PRESENT_MIN: usize = 4;
const JOB_KEYWORDS_MISSING_MAX: usize = 2;
const SCAM_CONTENT_MIN: usize = 2;
const REDIRECT_CHAIN_MIN: usize = 2;

/// Excess URLs are never inspected; keeps worst-case latency bounded.
const MAX_INSPECTED_URLS: usize = 3;
const MAX_REDIRECTS: usize = 10;
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const ERROR_FLAG_MAX_CHARS: usize = 50;
const FALLBACK_SCORE: u8 = 50;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s]+").unwrap());
static BARE_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:www\.)?([a-zA-Z0-9-]+\.[a-zA-Z]{2,}(?:\.[a-zA-Z]{2,})?)").unwrap()
});
static EMAIL_DOMAIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\w.-]+@([\w.-]+)").unwrap());

static OG_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta[^>]*property\s*=\s*["']og:type["'][^>]*content\s*=\s*["']([^"']*)["']|<meta[^>]*content\s*=\s*["']([^"']*)["'][^>]*property\s*=\s*["']og:type["']"#,
    )
    .unwrap()
});
static JSON_LD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .unwrap()
});
static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainReport {
    #[serde(default)]
    pub domain_score: u8,
    #[serde(default)]
    pub domain_flags: Vec<String>,
}

/// Terminal outcome of fetching one URL.
enum FetchOutcome {
    Fetched {
        status: u16,
        body: String,
        redirect_hops: usize,
    },
    Failed(FetchFailure),
}

/// Failure class of a fetch attempt. Each class terminates the inspection
/// with a fixed delta and a single flag; never retried.
#[derive(Debug, Clone, PartialEq)]
enum FetchFailure {
    Timeout,
    Certificate,
    Connection,
    Other(String),
}

impl FetchFailure {
    fn delta(&self) -> i32 {
        match self {
            FetchFailure::Timeout => 25,
            FetchFailure::Certificate => 30,
            FetchFailure::Connection => 35,
            FetchFailure::Other(_) => 20,
        }
    }

    fn flag(&self, url: &str) -> String {
        match self {
            FetchFailure::Timeout => format!("⚠️ URL timed out (slow/suspicious): {url}"),
            FetchFailure::Certificate => format!("🚨 SSL certificate error: {url}"),
            FetchFailure::Connection => format!("🚨 Could not connect to URL: {url}"),
            FetchFailure::Other(detail) => {
                let detail: String = detail.chars().take(ERROR_FLAG_MAX_CHARS).collect();
                format!("⚠️ Error checking URL: {detail}")
            }
        }
    }
}

/// Scores the URLs and email domains found in a posting. Degrades to a
/// fixed fallback report on unexpected failure instead of surfacing it.
pub async fn score(text: &str) -> DomainReport {
    match validate(text).await {
        Ok(report) => report,
        Err(err) => DomainReport {
            domain_score: FALLBACK_SCORE,
            domain_flags: vec![format!("⚠️ Error in domain validation: {err}")],
        },
    }
}

async fn validate(text: &str) -> Result<DomainReport> {
    let lower = text.to_lowercase();
    let mut score = 0i32;
    let mut flags = Vec::new();

    let urls = extract_urls(text);
    let mentioned = extract_bare_domains(text);
    if !mentioned.is_empty() {
        debug!(domains = ?mentioned, "bare domains mentioned in text");
    }

    for domain in extract_email_domains(text) {
        if GENERIC_EMAIL_PROVIDERS.contains(&domain.to_lowercase().as_str()) {
            score += POINTS_GENERIC_EMAIL;
            flags.push(format!("🚩 Generic email provider: {domain}"));
        } else {
            score += POINTS_CORPORATE_EMAIL;
            flags.push(format!("✅ Corporate email domain: {domain}"));
        }
    }

    if urls.is_empty() {
        // A posting that asks people to apply without a link is evidence.
        if APPLICATION_KEYWORDS.iter().any(|k| lower.contains(k)) {
            score += POINTS_NO_APPLICATION_URL;
            flags.push("🚩 No official URL provided for application".to_string());
        }
    } else {
        for url in urls.iter().take(MAX_INSPECTED_URLS) {
            let (delta, url_flags) = inspect_url(url).await?;
            score += delta;
            flags.extend(url_flags);
        }
    }

    if MESSAGING_APPS.iter().any(|app| lower.contains(app)) {
        let has_trusted_url = urls.iter().any(|url| {
            let url = url.to_lowercase();
            TRUSTED_PLATFORMS.iter().any(|trusted| url.contains(trusted))
        });
        if !has_trusted_url {
            score += POINTS_MESSAGING_RECRUITMENT;
            flags.push("🚨 Recruitment via messaging apps (WhatsApp/Telegram)".to_string());
        }
    }

    Ok(DomainReport {
        domain_score: score.clamp(0, 100) as u8,
        domain_flags: flags,
    })
}

pub async fn inspect_url(url: &str) -> Result<(i32, Vec<String>)> {
    match fetch(url).await? {
        FetchOutcome::Failed(failure) => Ok((failure.delta(), vec![failure.flag(url)])),
        FetchOutcome::Fetched {
            status,
            body,
            redirect_hops,
        } => Ok(assess_page(url, status, &body, redirect_hops)),
    }
}

async fn fetch(url: &str) -> Result<FetchOutcome> {
    // Client per inspection so the redirect policy can record the hop count
    // for this URL; reqwest does not expose redirect history.
    let hops = Arc::new(AtomicUsize::new(0));
    let policy = {
        let hops = Arc::clone(&hops);
        redirect::Policy::custom(move |attempt| {
            hops.store(attempt.previous().len(), Ordering::Relaxed);
            if attempt.previous().len() > MAX_REDIRECTS {
                attempt.stop()
            } else {
                attempt.follow()
            }
        })
    };
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(BROWSER_USER_AGENT)
        .redirect(policy)
        .build()?;

    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Ok(FetchOutcome::Fetched {
                status,
                body,
                redirect_hops: hops.load(Ordering::Relaxed),
            })
        }
        Err(err) => Ok(FetchOutcome::Failed(classify_error(&err))),
    }
}

fn classify_error(err: &reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        return FetchFailure::Timeout;
    }

    // reqwest does not type TLS failures; scan the source chain.
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(cause) = source {
        let detail = cause.to_string().to_lowercase();
        if detail.contains("certificate") || detail.contains("tls") || detail.contains("ssl") {
            return FetchFailure::Certificate;
        }
        source = cause.source();
    }

    if err.is_connect() {
        FetchFailure::Connection
    } else {
        FetchFailure::Other(err.to_string())
    }
}

/// Assesses a fetched page. A 404 short-circuits: nothing else about the
/// page matters once the posting links to a dead URL.
fn assess_page(url: &str, status: u16, body: &str, redirect_hops: usize) -> (i32, Vec<String>) {
    let mut score = 0i32;
    let mut flags = Vec::new();
    let host = host_of(url);

    match status {
        200 => flags.push(format!("✅ URL is accessible: {host}")),
        404 => return (POINTS_NOT_FOUND, vec![format!("🚨 URL not found (404): {url}")]),
        other => {
            score += POINTS_BAD_STATUS;
            flags.push(format!("⚠️ URL returned status {other}"));
        }
    }

    if url.starts_with("https://") {
        score += POINTS_HTTPS;
        flags.push("✅ Uses secure HTTPS".to_string());
    } else {
        score += POINTS_NO_HTTPS;
        flags.push("🚩 No HTTPS encryption".to_string());
    }

    let host_lower = host.to_lowercase();
    if TRUSTED_PLATFORMS.iter().any(|t| host_lower.contains(t)) {
        score += POINTS_TRUSTED_PLATFORM;
        flags.push(format!("✅ Posted on trusted platform: {host_lower}"));
    } else {
        score += POINTS_UNKNOWN_PLATFORM;
        flags.push(format!("⚠️ Unknown platform: {host_lower}"));
    }

    if let Some(og_type) = og_type(body) {
        if og_type.to_lowercase().contains("job") {
            score += POINTS_JOB_META_TAG;
            flags.push("✅ Confirmed job posting page".to_string());
        }
    }
    if let Some(block) = json_ld_block(body) {
        if block.contains("JobPosting") {
            score += POINTS_JOB_SCHEMA;
            flags.push("✅ Contains structured job data".to_string());
        }
    }

    let page_text = visible_text(body).to_lowercase();
    let keyword_count = JOB_PAGE_KEYWORDS
        .iter()
        .filter(|k| page_text.contains(*k))
        .count();
    if keyword_count >= JOB_KEYWORDS_PRESENT_MIN {
        score += POINTS_JOB_KEYWORDS_PRESENT;
        flags.push(format!(
            "✅ Page contains job details ({keyword_count}/{} keywords)",
            JOB_PAGE_KEYWORDS.len()
        ));
    } else if keyword_count < JOB_KEYWORDS_MISSING_MAX {
        score += POINTS_JOB_KEYWORDS_MISSING;
        flags.push("⚠️ Page lacks proper job description".to_string());
    }

    let scam_count = PAGE_SCAM_INDICATORS
        .iter()
        .filter(|i| page_text.contains(*i))
        .count();
    if scam_count >= SCAM_CONTENT_MIN {
        score += POINTS_SCAM_CONTENT;
        flags.push(format!("🚨 Page contains {scam_count} scam indicators"));
    }

    if redirect_hops > REDIRECT_CHAIN_MIN {
        score += POINTS_REDIRECT_CHAIN;
        flags.push(format!("⚠️ Multiple redirects detected ({redirect_hops})"));
    }

    (score, flags)
}

pub fn extract_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn extract_bare_domains(text: &str) -> Vec<String> {
    BARE_DOMAIN
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn extract_email_domains(text: &str) -> Vec<String> {
    EMAIL_DOMAIN
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn host_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_string())
}

fn og_type(body: &str) -> Option<String> {
    OG_TYPE
        .captures(body)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
}

fn json_ld_block(body: &str) -> Option<String> {
    JSON_LD.captures(body).map(|caps| caps[1].to_string())
}

pub(crate) fn visible_text(body: &str) -> String {
    let no_scripts = SCRIPT_BLOCK.replace_all(body, " ");
    let no_styles = STYLE_BLOCK.replace_all(&no_scripts, " ");
    HTML_TAG.replace_all(&no_styles, " ").to_string()
}
