use anyhow::Result;
use std::time::Duration;
use tracing::debug;

use crate::scoring::domain::visible_text;

pub const MAX_TEXT_LENGTH: usize = 3000;
pub const EMPTY_INPUT_FALLBACK: &str = "No text could be extracted from input";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "Mozilla/5.0";

/// Turns user input into plain text ready for scoring. URLs are fetched and
/// stripped to visible text; anything else passes through normalized. Never
/// fails: a fetch problem falls back to scoring the raw input.
pub async fn acquire(input: &str) -> String {
    let trimmed = input.trim();

    let text = if trimmed.starts_with("http") {
        match fetch_page_text(trimmed).await {
            Ok(text) => {
                debug!(chars = text.chars().count(), "extracted page text");
                text
            }
            Err(err) => {
                debug!(%err, "page fetch failed, scoring the raw input");
                normalize(trimmed)
            }
        }
    } else {
        normalize(trimmed)
    };

    if text.is_empty() {
        EMPTY_INPUT_FALLBACK.to_string()
    } else {
        text
    }
}

async fn fetch_page_text(url: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    let body = client.get(url).send().await?.text().await?;
    Ok(normalize(&visible_text(&body)))
}

fn normalize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_TEXT_LENGTH).collect()
}
