use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::etymology::format_etymology;
use crate::model::{EtymologyBlock, WordRecord};
use crate::provider::{GenerationError, WordProvider, fetch_illustration, fetch_word};

/// Message shown for every text generation failure.
pub const GENERATION_ERROR_MESSAGE: &str =
    "Fant ikke ordet eller noe gikk galt med AI-genereringen. Prøv igjen.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    PartiallyLoaded,
    Ready,
    Error,
}

/// Identifies one fetch cycle. Transitions tagged with an older cycle are
/// discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CycleId(pub u64);

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState {
    pub record: Option<WordRecord>,
    pub image_url: Option<String>,
    pub is_loading_text: bool,
    pub is_loading_image: bool,
    pub error: Option<String>,
    /// Current search-box text, independent of the last resolved word.
    pub query: String,
    pub phase: Phase,
    pub cycle: u64,
    /// Query of the most recent cycle; `None` for random fetches.
    pub last_query: Option<String>,
}

impl FetchState {
    pub fn etymology_blocks(&self) -> Vec<EtymologyBlock> {
        self.record
            .as_ref()
            .map(|record| format_etymology(&record.etymology))
            .unwrap_or_default()
    }

    pub fn is_busy(&self) -> bool {
        self.is_loading_text || self.is_loading_image
    }
}

/// A started cycle waiting to be driven by [`ViewController::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub cycle: CycleId,
    pub query: Option<String>,
}

/// Owns one [`FetchState`] and drives fetch cycles against a provider.
pub struct ViewController {
    provider: Arc<dyn WordProvider>,
    state: RwLock<FetchState>,
}

impl ViewController {
    pub fn new(provider: Arc<dyn WordProvider>) -> Self {
        Self {
            provider,
            state: RwLock::new(FetchState::default()),
        }
    }

    pub fn snapshot(&self) -> FetchState {
        self.state.read().clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.read().phase
    }

    pub fn set_query(&self, text: impl Into<String>) {
        self.state.write().query = text.into();
    }

    /// Enters `Loading` from any state and opens a new cycle.
    pub fn start_fetch(&self, query: Option<String>) -> FetchPlan {
        let query = query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        let mut state = self.state.write();
        state.cycle += 1;
        state.phase = Phase::Loading;
        state.record = None;
        state.image_url = None;
        state.error = None;
        state.is_loading_text = true;
        state.is_loading_image = false;
        state.last_query = query.clone();
        let cycle = CycleId(state.cycle);
        info!(cycle = cycle.0, query = ?query, "fetch cycle started");
        FetchPlan { cycle, query }
    }

    /// New random word; the search box is cleared.
    pub fn begin_random(&self) -> FetchPlan {
        self.state.write().query.clear();
        self.start_fetch(None)
    }

    /// Looks up the current search-box text. Blank input is ignored and
    /// leaves the state untouched.
    pub fn begin_search(&self) -> Option<FetchPlan> {
        let query = {
            let state = self.state.read();
            let trimmed = state.query.trim();
            if trimmed.is_empty() {
                debug!("ignoring blank search");
                return None;
            }
            trimmed.to_string()
        };
        Some(self.start_fetch(Some(query)))
    }

    /// Repeats the most recent cycle's request.
    pub fn begin_retry(&self) -> FetchPlan {
        let last = self.state.read().last_query.clone();
        self.start_fetch(last)
    }

    pub fn text_succeeded(&self, cycle: CycleId, record: WordRecord) -> bool {
        let mut state = self.state.write();
        if !is_current(&state, cycle, Phase::Loading) {
            return false;
        }
        info!(cycle = cycle.0, word = %record.word, "word resolved");
        state.record = Some(record);
        state.is_loading_text = false;
        state.is_loading_image = true;
        state.phase = Phase::PartiallyLoaded;
        true
    }

    pub fn text_failed(&self, cycle: CycleId, err: &GenerationError) -> bool {
        let mut state = self.state.write();
        if !is_current(&state, cycle, Phase::Loading) {
            return false;
        }
        info!(cycle = cycle.0, error = %err, "fetch cycle failed");
        state.record = None;
        state.image_url = None;
        state.error = Some(GENERATION_ERROR_MESSAGE.to_string());
        state.is_loading_text = false;
        state.is_loading_image = false;
        state.phase = Phase::Error;
        true
    }

    /// Finishes the cycle with or without an illustration.
    pub fn image_resolved(&self, cycle: CycleId, image_url: Option<String>) -> bool {
        let mut state = self.state.write();
        if !is_current(&state, cycle, Phase::PartiallyLoaded) {
            return false;
        }
        debug!(cycle = cycle.0, has_image = image_url.is_some(), "illustration resolved");
        state.image_url = image_url;
        state.is_loading_image = false;
        state.phase = Phase::Ready;
        true
    }

    /// Drives a started cycle to `Ready` or `Error`. A cycle superseded while
    /// its text request was in flight stops without requesting an image.
    pub async fn run(&self, plan: FetchPlan) {
        let FetchPlan { cycle, query } = plan;
        match fetch_word(self.provider.as_ref(), query.as_deref()).await {
            Ok(record) => {
                let illustration_input = record.clone();
                if !self.text_succeeded(cycle, record) {
                    return;
                }
                let image_url =
                    fetch_illustration(self.provider.as_ref(), &illustration_input).await;
                self.image_resolved(cycle, image_url);
            }
            Err(err) => {
                self.text_failed(cycle, &err);
            }
        }
    }

    pub async fn fetch_random(&self) {
        let plan = self.begin_random();
        self.run(plan).await;
    }

    /// Returns `false` when the search box was blank and nothing happened.
    pub async fn submit_search(&self) -> bool {
        match self.begin_search() {
            Some(plan) => {
                self.run(plan).await;
                true
            }
            None => false,
        }
    }

    pub async fn retry(&self) {
        let plan = self.begin_retry();
        self.run(plan).await;
    }
}

fn is_current(state: &FetchState, cycle: CycleId, expected: Phase) -> bool {
    if state.cycle != cycle.0 {
        debug!(
            stale = cycle.0,
            current = state.cycle,
            "discarding result from superseded cycle"
        );
        return false;
    }
    state.phase == expected
}
