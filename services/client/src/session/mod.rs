//! services/client/src/session/mod.rs
//!
//! The submission flow and its loading session. A `LoadingSession` is
//! created per accepted submission; it owns the cancellation token shared by
//! the cosmetic timer tasks (message rotator, tip rotation, progress
//! simulator) and the progress accumulator the polling loop may override.

pub mod bootstrap;
pub mod poll;
pub mod progress;
pub mod rotator;
pub mod submit;
pub mod tips;

use std::sync::Arc;

use meeting_comic_core::domain::ProgressState;
use meeting_comic_core::ports::{GenerationService, StatusView};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Fallback loading messages, used when the server provides no hints.
pub const FALLBACK_MESSAGES: [&str; 5] = [
    "laying out the comic panels",
    "sketching the characters",
    "coloring the backgrounds",
    "placing the speech bubbles",
    "almost there, hang tight",
];

/// Tips cycled on the loading screen.
pub const LOADING_TIPS: [&str; 3] = [
    "generation usually takes one to two minutes",
    "finished comics can be downloaded from the result page",
    "long notes may be split into several episodes",
];

/// The visitor identity as currently known to the UI. The bootstrap task
/// fills it in at startup; a nickname echoed on a creation response updates
/// it again.
#[derive(Debug, Default)]
pub struct VisitorState {
    pub id: Option<String>,
    pub nickname: Option<String>,
}

pub type SharedVisitor = Arc<Mutex<VisitorState>>;

/// Everything the submission flow needs, wired once at startup.
#[derive(Clone)]
pub struct SessionDeps {
    pub service: Arc<dyn GenerationService>,
    pub view: Arc<dyn StatusView>,
    pub visitor: SharedVisitor,
}

/// One loading session.
///
/// `stop()` is idempotent and cancels every pending cosmetic timer; it runs
/// before any screen transition away from the loading display, so no stale
/// timer callback can touch a screen the user no longer sees.
pub struct LoadingSession {
    cancel: CancellationToken,
    progress: Mutex<ProgressState>,
}

impl LoadingSession {
    /// Resets progress to (0, "preparing") and spawns the cosmetic timer
    /// tasks: message rotation over `hints` (or the fallback pool), tip
    /// rotation, and the progress simulator.
    pub fn start(view: Arc<dyn StatusView>, hints: Vec<String>) -> Arc<Self> {
        let session = Arc::new(Self {
            cancel: CancellationToken::new(),
            progress: Mutex::new(ProgressState::new()),
        });

        let initial = ProgressState::new();
        view.set_progress(initial.percent(), initial.label());

        let pool = if hints.is_empty() {
            FALLBACK_MESSAGES.iter().map(|m| m.to_string()).collect()
        } else {
            hints
        };

        tokio::spawn(rotator::rotate_messages(
            view.clone(),
            pool,
            session.cancel.clone(),
        ));
        tokio::spawn(tips::rotate_tips(view.clone(), session.cancel.clone()));
        tokio::spawn(progress::simulate_progress(view, session.clone()));

        session
    }

    /// Advances the cosmetic progress by one simulator tick. Returns the new
    /// displayable state when it changed.
    pub async fn advance_progress(&self, increment: f32) -> Option<(u8, String)> {
        let mut progress = self.progress.lock().await;
        if progress.advance(increment) {
            Some((progress.percent(), progress.label().to_string()))
        } else {
            None
        }
    }

    /// The authoritative completion override: progress jumps to 100/"done".
    /// Only the polling loop calls this.
    pub async fn complete_progress(&self) -> (u8, String) {
        let mut progress = self.progress.lock().await;
        progress.complete();
        (progress.percent(), progress.label().to_string())
    }

    /// Cancels all pending rotator/tip/simulator timers. Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
