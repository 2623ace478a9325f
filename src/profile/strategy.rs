use async_trait::async_trait;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    clients::{GenerativeTextClient, UpstreamError},
    profile::extract::{extract_json, ParseError},
};

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("{source}")]
    Unparsable { source: ParseError, raw: String },
}

/// One way of producing a profile object from a profile URL.
#[async_trait]
pub trait ProfileStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    async fn attempt(&self, profile_url: &str) -> Result<Value, EnrichError>;
}

/// Try each strategy in order and return the first success.
///
/// When all of them fail the result is an error marker:
/// `{"error": <first>, "fallbackError": <second>}`, plus `rawResponse` when the
/// last failure was a reply that could not be parsed.
pub async fn run_chain(strategies: &[Box<dyn ProfileStrategy>], profile_url: &str) -> Value {
    let mut failures = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        match strategy.attempt(profile_url).await {
            Ok(profile) => {
                debug!(strategy = strategy.name(), "profile strategy succeeded");
                return profile;
            }
            Err(e) => {
                warn!(strategy = strategy.name(), error = %e, "profile strategy failed");
                failures.push(e);
            }
        }
    }
    failure_marker(&failures)
}

fn failure_marker(failures: &[EnrichError]) -> Value {
    let mut marker = Map::new();
    if let Some(first) = failures.first() {
        marker.insert("error".into(), json!(first.to_string()));
    }
    if let Some(second) = failures.get(1) {
        marker.insert("fallbackError".into(), json!(second.to_string()));
    }
    if let Some(EnrichError::Unparsable { raw, .. }) = failures.last() {
        marker.insert("rawResponse".into(), json!(raw));
    }
    Value::Object(marker)
}

/// Ask the model and parse its reply into a JSON object.
pub async fn ask_json(
    llm: &dyn GenerativeTextClient,
    system: &str,
    prompt: &str,
) -> Result<Value, EnrichError> {
    let raw = llm.complete(system, prompt).await?;
    extract_json(&raw).map_err(|source| EnrichError::Unparsable { source, raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<Value, &'static str>);

    #[async_trait]
    impl ProfileStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn attempt(&self, _url: &str) -> Result<Value, EnrichError> {
            match &self.0 {
                Ok(v) => Ok(v.clone()),
                Err(raw) => Err(EnrichError::Unparsable {
                    source: ParseError("bad".into()),
                    raw: raw.to_string(),
                }),
            }
        }
    }

    struct Down;

    #[async_trait]
    impl ProfileStrategy for Down {
        fn name(&self) -> &'static str {
            "down"
        }

        async fn attempt(&self, _url: &str) -> Result<Value, EnrichError> {
            Err(UpstreamError::InvalidInput("service down".into()).into())
        }
    }

    #[tokio::test]
    async fn first_success_wins() {
        let chain: Vec<Box<dyn ProfileStrategy>> = vec![
            Box::new(Down),
            Box::new(Fixed(Ok(json!({"a": 1})))),
            Box::new(Fixed(Ok(json!({"b": 2})))),
        ];
        assert_eq!(run_chain(&chain, "u").await, json!({"a": 1}));
    }

    #[tokio::test]
    async fn exhausted_chain_reports_both_errors() {
        let chain: Vec<Box<dyn ProfileStrategy>> =
            vec![Box::new(Down), Box::new(Fixed(Err("prose reply")))];
        let marker = run_chain(&chain, "u").await;
        assert_eq!(marker["error"], "service down");
        assert!(marker["fallbackError"].as_str().unwrap().contains("bad"));
        assert_eq!(marker["rawResponse"], "prose reply");
    }

    #[tokio::test]
    async fn single_upstream_failure_has_only_error() {
        let chain: Vec<Box<dyn ProfileStrategy>> = vec![Box::new(Down)];
        let marker = run_chain(&chain, "u").await;
        assert_eq!(marker, json!({"error": "service down"}));
    }
}
