use tracing::{debug, info};

use super::collaborators::KnowledgeSource;

/// What the knowledge service reports for a single topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Summary(String),
    /// Candidate topics, in the order the service listed them.
    Disambiguation(Vec<String>),
    NotFound,
    Error(String),
}

/// Terminal state of the fallback chain for one unknown utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Answered { topic: String, summary: String },
    Disambiguated { topic: String, chosen: String, summary: String },
    NotFound { topic: String },
    Failed { topic: String, reason: String },
}

impl Resolution {
    /// Degraded outcomes carry a substitute web search on the original topic.
    pub fn fallback_query(&self) -> Option<&str> {
        match self {
            Resolution::NotFound { topic } | Resolution::Failed { topic, .. } => Some(topic.as_str()),
            _ => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.fallback_query().is_some()
    }
}

/// Next move after one lookup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackStep {
    Done(Resolution),
    Retry { candidate: String },
}

/// Pure transition: `retry_of` is the candidate being looked up, if this is
/// the second attempt. A second attempt never retries again.
pub fn next_step(topic: &str, retry_of: Option<&str>, outcome: LookupOutcome) -> FallbackStep {
    let topic = topic.to_string();
    match (retry_of, outcome) {
        (None, LookupOutcome::Summary(summary)) => {
            FallbackStep::Done(Resolution::Answered { topic, summary })
        }
        (Some(chosen), LookupOutcome::Summary(summary)) => FallbackStep::Done(Resolution::Disambiguated {
            topic,
            chosen: chosen.to_string(),
            summary,
        }),
        (None, LookupOutcome::Disambiguation(candidates)) => match candidates.into_iter().next() {
            Some(candidate) => FallbackStep::Retry { candidate },
            None => FallbackStep::Done(Resolution::Failed {
                topic,
                reason: "disambiguation without candidates".to_string(),
            }),
        },
        (None, LookupOutcome::NotFound) => FallbackStep::Done(Resolution::NotFound { topic }),
        (None, LookupOutcome::Error(reason)) => FallbackStep::Done(Resolution::Failed { topic, reason }),
        (Some(chosen), other) => FallbackStep::Done(Resolution::Failed {
            topic,
            reason: format!("lookup of '{}' failed: {:?}", chosen, other),
        }),
    }
}

/// Direct lookup, then at most one retry on the first disambiguation candidate.
pub async fn resolve_unknown<K: KnowledgeSource>(source: &mut K, topic: &str) -> Resolution {
    let first = source.summarize(topic).await;
    let candidate = match next_step(topic, None, first) {
        FallbackStep::Done(resolution) => return log_resolution(resolution),
        FallbackStep::Retry { candidate } => candidate,
    };

    debug!(candidate = %candidate, "Ambiguous topic, retrying on first candidate");
    let second = source.summarize(&candidate).await;
    match next_step(topic, Some(&candidate), second) {
        FallbackStep::Done(resolution) => log_resolution(resolution),
        // next_step never retries twice
        FallbackStep::Retry { .. } => log_resolution(Resolution::Failed {
            topic: topic.to_string(),
            reason: "repeated disambiguation".to_string(),
        }),
    }
}

fn log_resolution(resolution: Resolution) -> Resolution {
    let outcome = match &resolution {
        Resolution::Answered { .. } => "answered",
        Resolution::Disambiguated { .. } => "disambiguated",
        Resolution::NotFound { .. } => "not_found",
        Resolution::Failed { .. } => "failed",
    };
    info!(outcome, "Knowledge lookup resolved");
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disambiguation_retries_first_candidate() {
        let step = next_step(
            "paris",
            None,
            LookupOutcome::Disambiguation(vec!["Paris, France".into(), "Paris, Texas".into()]),
        );
        assert_eq!(step, FallbackStep::Retry { candidate: "Paris, France".into() });
    }

    #[test]
    fn second_attempt_failure_is_generic() {
        let step = next_step("paris", Some("Paris, France"), LookupOutcome::NotFound);
        match step {
            FallbackStep::Done(Resolution::Failed { topic, .. }) => assert_eq!(topic, "paris"),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn empty_candidate_list_fails() {
        let step = next_step("x", None, LookupOutcome::Disambiguation(vec![]));
        assert!(matches!(step, FallbackStep::Done(Resolution::Failed { .. })));
    }
}
