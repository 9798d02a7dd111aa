pub mod domain;
pub mod ports;

pub use domain::{
    GenerationRequest, ImageAttachment, MessageRotation, NoteContent, ProgressState,
    SubmissionReceipt, TaskState, TaskStatusReport, TaskSummary, VisitorProfile,
};
pub use ports::{GenerationService, PortError, PortResult, StatusView, VisitorStore};
