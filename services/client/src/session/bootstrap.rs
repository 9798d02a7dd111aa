//! services/client/src/session/bootstrap.rs
//!
//! Best-effort visitor registration and history loading at startup. This is
//! an enhancement, never a precondition: the caller spawns it and discards
//! the `Result`, and nothing in the submission flow waits on it.

use std::sync::Arc;

use meeting_comic_core::ports::{GenerationService, PortResult, StatusView, VisitorStore};
use tokio::task::JoinHandle;
use tracing::debug;

use super::SharedVisitor;

/// Establishes the durable visitor identity, then loads that visitor's past
/// tasks. Any failure along the chain aborts the rest of the bootstrap and
/// surfaces nowhere but the debug log.
pub async fn run(
    service: Arc<dyn GenerationService>,
    store: Arc<dyn VisitorStore>,
    view: Arc<dyn StatusView>,
    visitor: SharedVisitor,
) -> PortResult<()> {
    let existing = store.load().await?;
    let profile = service.register_visitor(existing.as_deref()).await?;
    store.save(&profile.id).await?;

    {
        let mut state = visitor.lock().await;
        state.id = Some(profile.id.clone());
        state.nickname = profile.nickname.clone();
    }
    if let Some(nickname) = &profile.nickname {
        view.set_greeting(nickname);
    }

    let history = service.history(&profile.id).await?;
    if !history.is_empty() {
        view.render_history(&history);
    }
    Ok(())
}

/// Fire-and-forget wrapper around [`run`]: the error branch is explicitly
/// dropped here, at the one place allowed to drop it.
pub fn spawn(
    service: Arc<dyn GenerationService>,
    store: Arc<dyn VisitorStore>,
    view: Arc<dyn StatusView>,
    visitor: SharedVisitor,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = run(service, store, view, visitor).await {
            debug!("visitor bootstrap skipped: {e}");
        }
    })
}
