//! services/client/src/session/submit.rs
//!
//! The submission controller: validates the note, issues the creation
//! request, and on success starts the loading session and the polling loop.

use std::path::Path;

use meeting_comic_core::domain::{GenerationRequest, SubmissionReceipt};
use meeting_comic_core::ports::PortError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::extract::extract_content;

use super::poll::{self, PollOutcome};
use super::{LoadingSession, SessionDeps};

/// Errors a submission can hit before a task exists. Each one is shown on
/// the form and leaves it usable.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The only locally validated precondition: the note had no text.
    #[error("content required")]
    EmptyContent,

    /// The service refused the creation request; the server's detail passes
    /// through to the user untouched.
    #[error("{0}")]
    Rejected(String),

    /// Transport or decode failure talking to the service.
    #[error("could not reach the generation service")]
    Network(String),
}

impl From<PortError> for SubmitError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Rejected(detail) => SubmitError::Rejected(detail),
            PortError::Network(detail) | PortError::Storage(detail) => SubmitError::Network(detail),
        }
    }
}

/// Runs one full submission: extraction, validation, the creation request,
/// then the loading session and polling loop.
///
/// Terminal-state UI transitions all happen in here (or in the polling
/// loop); the caller only learns how the run ended. `None` means the
/// submission never reached the loading screen and the error is already on
/// display.
pub async fn submit(deps: &SessionDeps, raw_note: &str, note_dir: &Path) -> Option<PollOutcome> {
    let submission_id = Uuid::new_v4();
    info!(%submission_id, "submission started");

    deps.view.set_submit_busy(true);
    deps.view.clear_error();

    let outcome = match create_task(deps, raw_note, note_dir).await {
        Ok(receipt) => {
            let badge = {
                let mut visitor = deps.visitor.lock().await;
                if let Some(nickname) = &receipt.nickname {
                    visitor.nickname = Some(nickname.clone());
                }
                match &visitor.nickname {
                    Some(nickname) => format!("{nickname}'s comic in progress"),
                    None => "comic in progress".to_string(),
                }
            };

            deps.view.show_loading();
            deps.view.set_status_badge(&badge);

            let session = LoadingSession::start(deps.view.clone(), receipt.rotation_hints);
            let outcome = poll::poll_until_done(
                deps.service.clone(),
                deps.view.clone(),
                session,
                &receipt.task_id,
            )
            .await;
            Some(outcome)
        }
        Err(e) => {
            warn!(%submission_id, "submission failed: {e:?}");
            deps.view.show_form();
            deps.view.show_error(&e.to_string());
            None
        }
    };

    deps.view.set_submit_busy(false);
    outcome
}

/// Extraction, validation, and the creation request itself.
async fn create_task(
    deps: &SessionDeps,
    raw_note: &str,
    note_dir: &Path,
) -> Result<SubmissionReceipt, SubmitError> {
    let content = extract_content(raw_note, note_dir).await;
    if content.text.is_empty() {
        return Err(SubmitError::EmptyContent);
    }

    let visitor_id = deps.visitor.lock().await.id.clone();
    let request = GenerationRequest {
        meeting_text: content.text,
        visitor_id,
        images: content.images,
    };

    let receipt = deps.service.submit(request).await?;
    info!(
        "task {} created ({} rotation hints)",
        receipt.task_id,
        receipt.rotation_hints.len()
    );
    Ok(receipt)
}
