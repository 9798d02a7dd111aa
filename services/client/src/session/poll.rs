//! services/client/src/session/poll.rs
//!
//! The status-polling loop — the sole authority for terminal outcomes. The
//! cosmetic timers only decorate the wait; what this loop observes decides
//! whether the user lands on the result view or back on the form.

use std::sync::Arc;
use std::time::Duration;

use meeting_comic_core::domain::TaskState;
use meeting_comic_core::ports::{GenerationService, StatusView};
use tokio::time::sleep;
use tracing::{info, warn};

use super::LoadingSession;

/// Inter-poll delay.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Hard ceiling on status requests per task (~4 minutes of wall time).
pub const MAX_POLL_ATTEMPTS: u32 = 120;

/// Pause after the 100% state renders, before handing over to the result
/// view.
pub const NAVIGATE_DELAY: Duration = Duration::from_millis(500);

const FAILED_FALLBACK: &str = "comic generation failed";
const STATUS_ERROR_MESSAGE: &str = "could not check the generation status";
const TIMEOUT_MESSAGE: &str = "timed out waiting for the comic, please try again";

/// How one polling run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Completed,
    Failed,
    TimedOut,
    TransportError,
}

/// Polls `task_id` until a terminal status, a transport failure, or the
/// attempt ceiling — whichever comes first. Every exit path cancels the
/// cosmetic timers before its screen transition, and the loop never issues
/// another request once a terminal branch is taken.
pub async fn poll_until_done(
    service: Arc<dyn GenerationService>,
    view: Arc<dyn StatusView>,
    session: Arc<LoadingSession>,
    task_id: &str,
) -> PollOutcome {
    for attempt in 1..=MAX_POLL_ATTEMPTS {
        let report = match service.task_status(task_id).await {
            Ok(report) => report,
            Err(e) => {
                // A single broken poll ends the loop; the server state is
                // unknown and guessing helps nobody.
                warn!("status poll {attempt} for task {task_id} failed: {e}");
                session.stop();
                view.show_form();
                view.show_error(STATUS_ERROR_MESSAGE);
                return PollOutcome::TransportError;
            }
        };

        match report.state {
            TaskState::Completed => {
                let (percent, label) = session.complete_progress().await;
                view.set_progress(percent, &label);
                session.stop();
                // Let the 100% state render before leaving the screen.
                sleep(NAVIGATE_DELAY).await;
                view.navigate_to_result(task_id);
                info!("task {task_id} completed after {attempt} status polls");
                return PollOutcome::Completed;
            }
            TaskState::Failed => {
                session.stop();
                view.show_form();
                view.show_error(report.error_message.as_deref().unwrap_or(FAILED_FALLBACK));
                return PollOutcome::Failed;
            }
            TaskState::Pending | TaskState::Processing => {
                sleep(POLL_INTERVAL).await;
            }
        }
    }

    session.stop();
    view.show_form();
    view.show_error(TIMEOUT_MESSAGE);
    PollOutcome::TimedOut
}
