//! services/client/src/session/rotator.rs
//!
//! The message-rotation timer task for one loading session: cycles the
//! loading message through its pool without immediate repetition until the
//! session token fires.

use std::sync::Arc;
use std::time::Duration;

use meeting_comic_core::domain::MessageRotation;
use meeting_comic_core::ports::StatusView;
use rand::Rng;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Length of the "fading" window before each swap. Purely presentational.
pub const FADE: Duration = Duration::from_millis(300);

/// Bounds of the randomized inter-message interval, in milliseconds.
const MIN_INTERVAL_MS: u64 = 2_000;
const MAX_INTERVAL_MS: u64 = 3_000;

/// Shows the first message immediately, then swaps after a uniformly random
/// 2.0–3.0 s per message, entering the fade state 300 ms before each swap.
/// Cancellation drops the pending timer and resets the fade flag; nothing
/// touches the display after that.
pub async fn rotate_messages(
    view: Arc<dyn StatusView>,
    pool: Vec<String>,
    cancel: CancellationToken,
) {
    let mut rotation = MessageRotation::new(pool);

    // The session can be over before this task first runs.
    if cancel.is_cancelled() {
        return;
    }
    let Some(first) = next_message(&mut rotation) else {
        return;
    };
    view.set_rotating_message(&first);

    loop {
        let interval =
            Duration::from_millis(rand::thread_rng().gen_range(MIN_INTERVAL_MS..=MAX_INTERVAL_MS));
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = sleep(interval) => {}
        }

        view.set_message_fading(true);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                view.set_message_fading(false);
                return;
            }
            _ = sleep(FADE) => {}
        }

        if let Some(message) = next_message(&mut rotation) {
            view.set_rotating_message(&message);
        }
        view.set_message_fading(false);
    }
}

fn next_message(rotation: &mut MessageRotation) -> Option<String> {
    rotation
        .next(&mut rand::thread_rng())
        .map(|message| message.to_string())
}
