//! Shared test doubles for the submission and polling tests: a scripted
//! generation backend that counts its calls, and a view that records every
//! display mutation.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use client_lib::session::{SessionDeps, VisitorState};
use meeting_comic_core::domain::{
    GenerationRequest, SubmissionReceipt, TaskState, TaskStatusReport, TaskSummary, VisitorProfile,
};
use meeting_comic_core::ports::{GenerationService, PortError, PortResult, StatusView};

//=========================================================================================
// Scripted Backend
//=========================================================================================

/// What a scripted endpoint should answer.
pub enum Scripted<T> {
    Ok(T),
    Rejected(String),
    Network(String),
}

impl<T: Clone> Scripted<T> {
    fn produce(&self) -> PortResult<T> {
        match self {
            Scripted::Ok(value) => Ok(value.clone()),
            Scripted::Rejected(detail) => Err(PortError::Rejected(detail.clone())),
            Scripted::Network(detail) => Err(PortError::Network(detail.clone())),
        }
    }
}

pub struct FakeBackend {
    pub register_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub last_existing_id: Mutex<Option<Option<String>>>,
    pub last_request: Mutex<Option<GenerationRequest>>,
    /// `None` echoes the given id (or issues "v-new") with no nickname.
    pub visitor_script: Option<Scripted<VisitorProfile>>,
    pub history_script: Scripted<Vec<TaskSummary>>,
    pub submit_script: Scripted<SubmissionReceipt>,
    /// Status answers consumed front to back; once the queue is dry,
    /// `status_default` answers forever.
    pub status_queue: Mutex<VecDeque<TaskStatusReport>>,
    pub status_default: Scripted<TaskStatusReport>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            register_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            last_existing_id: Mutex::new(None),
            last_request: Mutex::new(None),
            visitor_script: None,
            history_script: Scripted::Ok(Vec::new()),
            submit_script: Scripted::Ok(receipt("t1")),
            status_queue: Mutex::new(VecDeque::new()),
            status_default: Scripted::Ok(report(TaskState::Completed, None)),
        }
    }

    pub fn with_visitor(mut self, script: Scripted<VisitorProfile>) -> Self {
        self.visitor_script = Some(script);
        self
    }

    pub fn with_history(mut self, script: Scripted<Vec<TaskSummary>>) -> Self {
        self.history_script = script;
        self
    }

    pub fn with_submit(mut self, script: Scripted<SubmissionReceipt>) -> Self {
        self.submit_script = script;
        self
    }

    pub fn with_status_queue(self, reports: Vec<TaskStatusReport>) -> Self {
        *self.status_queue.lock().unwrap() = reports.into();
        self
    }

    pub fn with_status_default(mut self, script: Scripted<TaskStatusReport>) -> Self {
        self.status_default = script;
        self
    }
}

#[async_trait]
impl GenerationService for FakeBackend {
    async fn register_visitor(&self, existing_id: Option<&str>) -> PortResult<VisitorProfile> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_existing_id.lock().unwrap() = Some(existing_id.map(str::to_string));
        match &self.visitor_script {
            Some(script) => script.produce(),
            None => Ok(VisitorProfile {
                id: existing_id.unwrap_or("v-new").to_string(),
                nickname: None,
            }),
        }
    }

    async fn history(&self, _visitor_id: &str) -> PortResult<Vec<TaskSummary>> {
        self.history_script.produce()
    }

    async fn submit(&self, request: GenerationRequest) -> PortResult<SubmissionReceipt> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        self.submit_script.produce()
    }

    async fn task_status(&self, _task_id: &str) -> PortResult<TaskStatusReport> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.status_queue.lock().unwrap().pop_front() {
            return Ok(next);
        }
        self.status_default.produce()
    }
}

pub fn receipt(task_id: &str) -> SubmissionReceipt {
    SubmissionReceipt {
        task_id: task_id.to_string(),
        rotation_hints: Vec::new(),
        nickname: None,
    }
}

pub fn report(state: TaskState, error_message: Option<&str>) -> TaskStatusReport {
    TaskStatusReport {
        state,
        error_message: error_message.map(str::to_string),
    }
}

//=========================================================================================
// Recording View
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Form,
    Loading,
    Error(String),
    ClearError,
    SubmitBusy(bool),
    Greeting(String),
    Badge(String),
    Message(String),
    Fading(bool),
    Tip(String),
    Progress(u8, String),
    History(usize),
    Navigate(String),
}

#[derive(Default)]
pub struct RecordingView {
    pub events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn progress_values(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Progress(percent, _) => Some(percent),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl StatusView for RecordingView {
    fn show_form(&self) {
        self.push(ViewEvent::Form);
    }
    fn show_loading(&self) {
        self.push(ViewEvent::Loading);
    }
    fn show_error(&self, message: &str) {
        self.push(ViewEvent::Error(message.to_string()));
    }
    fn clear_error(&self) {
        self.push(ViewEvent::ClearError);
    }
    fn set_submit_busy(&self, busy: bool) {
        self.push(ViewEvent::SubmitBusy(busy));
    }
    fn set_greeting(&self, nickname: &str) {
        self.push(ViewEvent::Greeting(nickname.to_string()));
    }
    fn set_status_badge(&self, label: &str) {
        self.push(ViewEvent::Badge(label.to_string()));
    }
    fn set_rotating_message(&self, message: &str) {
        self.push(ViewEvent::Message(message.to_string()));
    }
    fn set_message_fading(&self, fading: bool) {
        self.push(ViewEvent::Fading(fading));
    }
    fn set_tip(&self, tip: &str) {
        self.push(ViewEvent::Tip(tip.to_string()));
    }
    fn set_progress(&self, percent: u8, label: &str) {
        self.push(ViewEvent::Progress(percent, label.to_string()));
    }
    fn render_history(&self, entries: &[TaskSummary]) {
        self.push(ViewEvent::History(entries.len()));
    }
    fn navigate_to_result(&self, task_id: &str) {
        self.push(ViewEvent::Navigate(task_id.to_string()));
    }
}

/// Wires a scripted backend and a recording view into `SessionDeps`.
pub fn deps(backend: Arc<FakeBackend>, view: Arc<RecordingView>) -> SessionDeps {
    SessionDeps {
        service: backend,
        view,
        visitor: Arc::new(tokio::sync::Mutex::new(VisitorState::default())),
    }
}
