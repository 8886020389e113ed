//! Session counters.
//!
//! # PRIVACY INVARIANT
//! Counters are keyed by rule and outcome labels only. Utterances, notes and
//! summaries are never recorded here.

use std::collections::BTreeMap;

use tracing::info;
use uuid::Uuid;

use super::knowledge::Resolution;

#[derive(Debug, Clone)]
pub struct SessionStats {
    pub session_id: Uuid,
    pub turns: u64,
    pub action_counts: BTreeMap<&'static str, u64>,
    pub answered_lookups: u64,
    pub degraded_lookups: u64,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            turns: 0,
            action_counts: BTreeMap::new(),
            answered_lookups: 0,
            degraded_lookups: 0,
        }
    }

    pub fn record_action(&mut self, kind: &'static str) {
        self.turns += 1;
        *self.action_counts.entry(kind).or_insert(0) += 1;
    }

    pub fn record_resolution(&mut self, resolution: &Resolution) {
        if resolution.is_degraded() {
            self.degraded_lookups += 1;
        } else {
            self.answered_lookups += 1;
        }
    }

    /// Called once on shutdown.
    pub fn log_summary(&self) {
        info!(
            session = %self.session_id,
            turns = self.turns,
            answered_lookups = self.answered_lookups,
            degraded_lookups = self.degraded_lookups,
            actions = ?self.action_counts,
            "Session summary"
        );
    }
}
