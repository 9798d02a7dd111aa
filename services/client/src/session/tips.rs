//! services/client/src/session/tips.rs
//!
//! Fixed-cadence tip rotation on the loading screen.

use std::sync::Arc;
use std::time::Duration;

use meeting_comic_core::ports::StatusView;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::LOADING_TIPS;

const TIP_INTERVAL: Duration = Duration::from_secs(8);

/// Cycles through the static tip pool in order, every 8 seconds, until the
/// session token fires.
pub async fn rotate_tips(view: Arc<dyn StatusView>, cancel: CancellationToken) {
    let mut index = 0;
    if cancel.is_cancelled() {
        return;
    }
    view.set_tip(LOADING_TIPS[index]);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = sleep(TIP_INTERVAL) => {}
        }
        index = (index + 1) % LOADING_TIPS.len();
        view.set_tip(LOADING_TIPS[index]);
    }
}
