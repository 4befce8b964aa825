use crate::model::ItemSnapshot;
use crate::scenario::{JourneyState, Step};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A step that completed with all of its expectations met
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step: Step,
    pub state: JourneyState,
    pub elapsed_ms: u64,
}

/// Outcome of a passing run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub started_at: DateTime<Utc>,
    pub base_url: String,
    pub steps: Vec<StepRecord>,
    pub item: Option<ItemSnapshot>,
    pub final_state: JourneyState,
}

impl ScenarioReport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            started_at: Utc::now(),
            base_url: base_url.into(),
            steps: Vec::new(),
            item: None,
            final_state: JourneyState::Unauthenticated,
        }
    }

    pub fn record(&mut self, step: Step, state: JourneyState, elapsed_ms: u64) {
        self.steps.push(StepRecord {
            step,
            state,
            elapsed_ms,
        });
        self.final_state = state;
    }

    pub fn total_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.elapsed_ms).sum()
    }
}
