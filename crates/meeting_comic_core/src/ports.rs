//! crates/meeting_comic_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the client's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! orchestration independent of the concrete HTTP transport, the durable
//! visitor store, and whatever renders the screen.

use async_trait::async_trait;

use crate::domain::{
    GenerationRequest, SubmissionReceipt, TaskStatusReport, TaskSummary, VisitorProfile,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The remote service understood the request and refused it. The detail
    /// is the server's own message and is surfaced to the user verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Transport failure, or a response body that could not be decoded.
    #[error("network error: {0}")]
    Network(String),

    /// Durable local state (the visitor id file) could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The remote comic-generation service, as the client sees it.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Issues a new visitor identity, or refreshes an existing one when
    /// `existing_id` is given.
    async fn register_visitor(&self, existing_id: Option<&str>) -> PortResult<VisitorProfile>;

    /// This visitor's past tasks, newest first.
    async fn history(&self, visitor_id: &str) -> PortResult<Vec<TaskSummary>>;

    /// Creates a generation task. The transport encoding is the adapter's
    /// concern: requests carrying attachments go out as multipart, text-only
    /// requests as JSON.
    async fn submit(&self, request: GenerationRequest) -> PortResult<SubmissionReceipt>;

    /// One status poll for a previously created task.
    async fn task_status(&self, task_id: &str) -> PortResult<TaskStatusReport>;
}

/// Durable storage for the anonymous visitor id. The id survives for the
/// lifetime of the local profile; it is never explicitly destroyed.
#[async_trait]
pub trait VisitorStore: Send + Sync {
    async fn load(&self) -> PortResult<Option<String>>;
    async fn save(&self, visitor_id: &str) -> PortResult<()>;
}

/// The visible screen.
///
/// Implementations keep the form and loading screens mutually exclusive;
/// errors render alongside the form. Only the submission controller and the
/// polling loop drive these transitions.
pub trait StatusView: Send + Sync {
    fn show_form(&self);
    fn show_loading(&self);
    fn show_error(&self, message: &str);
    fn clear_error(&self);

    /// Disables the submit control while the note is parsed and the creation
    /// request is in flight; `false` restores it.
    fn set_submit_busy(&self, busy: bool);

    fn set_greeting(&self, nickname: &str);
    fn set_status_badge(&self, label: &str);

    fn set_rotating_message(&self, message: &str);
    fn set_message_fading(&self, fading: bool);
    fn set_tip(&self, tip: &str);
    fn set_progress(&self, percent: u8, label: &str);

    fn render_history(&self, entries: &[TaskSummary]);

    /// Terminal success: hand the user over to the result view for `task_id`.
    fn navigate_to_result(&self, task_id: &str);
}
