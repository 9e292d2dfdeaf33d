use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextReport {
    #[serde(default)]
    pub llm_score: u8,
    #[serde(default)]
    pub top_reasons: Vec<String>,
    #[serde(default)]
    pub explain_brief: String,
}

/// Contextual risk signal. The combiner only depends on the record
/// contract, so a remote model, a local model, or a canned record all
/// satisfy it identically.
#[allow(async_fn_in_trait)]
pub trait ContextScorer {
    async fn score(&self, text: &str) -> Result<ContextReport>;
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    text: &'a str,
}

/// Posts the text to a scoring endpoint and decodes the record.
pub struct RemoteScorer {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteScorer {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(REMOTE_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl ContextScorer for RemoteScorer {
    async fn score(&self, text: &str) -> Result<ContextReport> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ScoreRequest { text })
            .send()
            .await
            .context("contextual scorer request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("contextual scorer returned {}", response.status());
        }

        response
            .json()
            .await
            .context("contextual scorer returned a malformed record")
    }
}

/// Pre-computed contextual record; stands in when no endpoint is configured
/// or when the record arrived out of band.
pub struct FixedScorer(pub ContextReport);

impl FixedScorer {
    pub fn neutral() -> Self {
        Self(ContextReport {
            llm_score: 0,
            top_reasons: Vec::new(),
            explain_brief: "Contextual analysis unavailable".to_string(),
        })
    }
}

impl ContextScorer for FixedScorer {
    async fn score(&self, _text: &str) -> Result<ContextReport> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_record_parses_with_defaults() {
        let report: ContextReport = serde_json::from_str(r#"{"llm_score": 55}"#).unwrap();
        assert_eq!(report.llm_score, 55);
        assert!(report.top_reasons.is_empty());
        assert!(report.explain_brief.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let report = ContextReport {
            llm_score: 70,
            top_reasons: vec!["Pressure tactics".to_string()],
            explain_brief: "Urgency and payment demands".to_string(),
        };
        let json = serde_json::to_string(&report).unwrap();
        let parsed: ContextReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[tokio::test]
    async fn test_fixed_scorer_returns_record() {
        let record = ContextReport {
            llm_score: 42,
            ..Default::default()
        };
        let scorer = FixedScorer(record.clone());
        assert_eq!(scorer.score("anything").await.unwrap(), record);
    }
}
