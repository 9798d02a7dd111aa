//! crates/meeting_comic_core/src/domain.rs
//!
//! Defines the pure, core data structures for the client.
//! These structs are independent of any transport or rendering concern.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;

/// An anonymous visitor identity as issued by the remote service.
#[derive(Debug, Clone)]
pub struct VisitorProfile {
    pub id: String,
    pub nickname: Option<String>,
}

/// One binary image attachment pulled out of the note, in document order.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// The extractor's view of a note: rendered plain text plus the embedded
/// images that could be materialized.
#[derive(Debug, Clone, Default)]
pub struct NoteContent {
    pub text: String,
    pub images: Vec<ImageAttachment>,
}

/// One submission to the generation service. Built at submit time from a
/// `NoteContent` and discarded once the creation call resolves.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub meeting_text: String,
    pub visitor_id: Option<String>,
    pub images: Vec<ImageAttachment>,
}

/// What the service hands back for an accepted creation request.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub task_id: String,
    /// Server-picked loading messages; the rotator falls back to a built-in
    /// pool when this is empty.
    pub rotation_hints: Vec<String>,
    pub nickname: Option<String>,
}

/// Client-visible lifecycle of a server-side generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskState {
    /// `completed` and `failed` are terminal: once observed for a task id,
    /// that id is never polled again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

/// One answer from the status endpoint.
#[derive(Debug, Clone)]
pub struct TaskStatusReport {
    pub state: TaskState,
    pub error_message: Option<String>,
}

/// A past task of this visitor, fetched read-only in a batch.
#[derive(Debug, Clone)]
pub struct TaskSummary {
    pub id: String,
    pub state: TaskState,
    pub created_at: DateTime<Utc>,
    pub preview: String,
    pub thumbnail_url: Option<String>,
}

//=========================================================================================
// Simulated Progress
//=========================================================================================

/// One stop of the simulated progress run.
#[derive(Debug, Clone, Copy)]
pub struct ProgressStage {
    pub target: f32,
    pub label: &'static str,
}

/// The fixed stage table the simulator climbs through. Targets are strictly
/// increasing and stay well below 100: the final stretch belongs to the real
/// completion signal from the status poll.
pub const SIMULATED_STAGES: [ProgressStage; 6] = [
    ProgressStage { target: 20.0, label: "analyzing the notes..." },
    ProgressStage { target: 40.0, label: "composing the story..." },
    ProgressStage { target: 55.0, label: "drawing panel 1..." },
    ProgressStage { target: 70.0, label: "drawing panel 2..." },
    ProgressStage { target: 82.0, label: "drawing panel 3..." },
    ProgressStage { target: 92.0, label: "drawing panel 4..." },
];

/// Bounds of the per-tick percent increment, in percentage points.
pub const MIN_TICK_INCREMENT: f32 = 0.3;
pub const MAX_TICK_INCREMENT: f32 = 1.8;

/// Cosmetic progress for one loading session.
///
/// The percent is monotone non-decreasing within a session, and only
/// `complete()` — called by the polling loop on a terminal success — can
/// take it to 100.
#[derive(Debug, Clone)]
pub struct ProgressState {
    percent: f32,
    label: String,
    stage: usize,
    completed: bool,
}

impl ProgressState {
    pub fn new() -> Self {
        Self {
            percent: 0.0,
            label: "preparing...".to_string(),
            stage: 0,
            completed: false,
        }
    }

    /// Advances the counter by `increment`, clamped to the current stage
    /// target; once a target is reached the next tick fills toward the
    /// following stage. Returns `true` when the displayable state changed.
    pub fn advance(&mut self, increment: f32) -> bool {
        if self.completed || self.stage >= SIMULATED_STAGES.len() {
            return false;
        }
        let ProgressStage { target, label } = SIMULATED_STAGES[self.stage];
        self.percent = (self.percent + increment.max(0.0)).min(target);
        self.label = label.to_string();
        if self.percent >= target {
            self.stage += 1;
        }
        true
    }

    /// The authoritative completion override.
    pub fn complete(&mut self) {
        self.completed = true;
        self.percent = 100.0;
        self.label = "done!".to_string();
    }

    /// Whole-percent value for display.
    pub fn percent(&self) -> u8 {
        self.percent.floor() as u8
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================================
// Message Rotation
//=========================================================================================

/// Picks loading messages uniformly at random without immediate repetition:
/// no message comes back until the whole pool has been shown, after which
/// the used set clears and every message is fair game again.
#[derive(Debug, Clone)]
pub struct MessageRotation {
    pool: Vec<String>,
    used: HashSet<usize>,
}

impl MessageRotation {
    pub fn new(pool: Vec<String>) -> Self {
        Self {
            pool,
            used: HashSet::new(),
        }
    }

    /// Returns the next message, or `None` for an empty pool.
    pub fn next(&mut self, rng: &mut impl Rng) -> Option<&str> {
        if self.pool.is_empty() {
            return None;
        }
        if self.used.len() >= self.pool.len() {
            self.used.clear();
        }
        let mut idx = rng.gen_range(0..self.pool.len());
        while self.used.contains(&idx) {
            idx = rng.gen_range(0..self.pool.len());
        }
        self.used.insert(idx);
        Some(&self.pool[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rotation_exhausts_pool_before_repeating() {
        let pool: Vec<String> = (0..5).map(|i| format!("msg {i}")).collect();
        let mut rotation = MessageRotation::new(pool.clone());
        let mut rng = StdRng::seed_from_u64(7);

        for _round in 0..4 {
            let mut seen = HashSet::new();
            for _ in 0..pool.len() {
                let msg = rotation.next(&mut rng).unwrap().to_string();
                assert!(seen.insert(msg), "repeated a message before pool exhaustion");
            }
        }
    }

    #[test]
    fn rotation_over_empty_pool_yields_nothing() {
        let mut rotation = MessageRotation::new(Vec::new());
        let mut rng = StdRng::seed_from_u64(7);
        assert!(rotation.next(&mut rng).is_none());
    }

    #[test]
    fn progress_is_monotone_and_stops_short_of_100() {
        let mut progress = ProgressState::new();
        let mut rng = StdRng::seed_from_u64(42);
        let mut last = progress.percent();

        // Far more ticks than the stage table can absorb.
        for _ in 0..10_000 {
            progress.advance(rng.gen_range(MIN_TICK_INCREMENT..=MAX_TICK_INCREMENT));
            let shown = progress.percent();
            assert!(shown >= last, "percent went backwards");
            last = shown;
        }
        assert_eq!(progress.percent(), 92, "simulator must park at the last stage target");
        assert!(!progress.is_complete());
    }

    #[test]
    fn progress_climbs_the_stage_labels_in_order() {
        let mut progress = ProgressState::new();
        let mut labels = Vec::new();
        for _ in 0..10_000 {
            progress.advance(1.0);
            if labels.last().map(String::as_str) != Some(progress.label()) {
                labels.push(progress.label().to_string());
            }
        }
        let expected: Vec<String> = SIMULATED_STAGES
            .iter()
            .map(|s| s.label.to_string())
            .collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn only_complete_reaches_100() {
        let mut progress = ProgressState::new();
        for _ in 0..1_000 {
            progress.advance(MAX_TICK_INCREMENT);
        }
        assert!(progress.percent() < 100);

        progress.complete();
        assert_eq!(progress.percent(), 100);
        assert_eq!(progress.label(), "done!");

        // Frozen after completion.
        assert!(!progress.advance(5.0));
        assert_eq!(progress.percent(), 100);
    }
}
