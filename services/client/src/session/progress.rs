//! services/client/src/session/progress.rs
//!
//! The progress-simulation timer task: climbs the fixed stage table on a
//! one-second tick so the user sees movement while the server works. The
//! percent it produces is cosmetic; only the polling loop can finish it.

use std::sync::Arc;
use std::time::Duration;

use meeting_comic_core::domain::{MAX_TICK_INCREMENT, MIN_TICK_INCREMENT};
use meeting_comic_core::ports::StatusView;
use rand::Rng;
use tokio::time::sleep;

use super::LoadingSession;

const TICK: Duration = Duration::from_secs(1);

/// Advances the session's progress by a small random amount every second
/// until the session token fires. Parks below 100 on its own.
pub async fn simulate_progress(view: Arc<dyn StatusView>, session: Arc<LoadingSession>) {
    loop {
        tokio::select! {
            biased;
            _ = session.cancel.cancelled() => return,
            _ = sleep(TICK) => {}
        }

        let increment = rand::thread_rng().gen_range(MIN_TICK_INCREMENT..=MAX_TICK_INCREMENT);
        if let Some((percent, label)) = session.advance_progress(increment).await {
            view.set_progress(percent, &label);
        }
    }
}
