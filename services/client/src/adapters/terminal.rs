//! services/client/src/adapters/terminal.rs
//!
//! Renders the client's screens to the terminal. This is the `StatusView`
//! adapter: the form prompt, the loading display (progress line, rotating
//! message, tips) and the error banner all land here.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use meeting_comic_core::domain::{TaskState, TaskSummary};
use meeting_comic_core::ports::StatusView;
use tracing::info;

/// Terminal renderer for the submission flow.
pub struct TerminalView {
    base_url: String,
    /// Whether the cursor currently sits on the `\r`-redrawn progress line.
    progress_line_open: AtomicBool,
}

impl TerminalView {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            progress_line_open: AtomicBool::new(false),
        }
    }

    fn result_url(&self, task_id: &str) -> String {
        format!("{}/view/{}", self.base_url, task_id)
    }

    /// Prints a full line, closing the progress line first when one is open.
    fn line(&self, text: &str) {
        if self.progress_line_open.swap(false, Ordering::Relaxed) {
            println!();
        }
        println!("{text}");
    }
}

impl StatusView for TerminalView {
    fn show_form(&self) {
        self.line("");
        self.line("── meeting comic ──");
        self.line("paste your meeting notes (a file path or the text itself), then press enter:");
    }

    fn show_loading(&self) {
        self.line("");
        self.line("generating your comic — hang tight");
    }

    fn show_error(&self, message: &str) {
        self.line(&format!("✗ {message}"));
    }

    fn clear_error(&self) {
        // Nothing to clear on an append-only terminal.
    }

    fn set_submit_busy(&self, busy: bool) {
        if busy {
            self.line("🤔 reading your notes...");
        }
    }

    fn set_greeting(&self, nickname: &str) {
        self.line(&format!("welcome back, {nickname}!"));
    }

    fn set_status_badge(&self, label: &str) {
        self.line(&format!("[{label}]"));
    }

    fn set_rotating_message(&self, message: &str) {
        self.line(&format!("  · {message}"));
    }

    fn set_message_fading(&self, _fading: bool) {
        // A terminal has no fade transition.
    }

    fn set_tip(&self, tip: &str) {
        self.line(&format!("  tip: {tip}"));
    }

    fn set_progress(&self, percent: u8, label: &str) {
        print!("\r  {percent:>3}% {label}          ");
        let _ = std::io::stdout().flush();
        self.progress_line_open.store(true, Ordering::Relaxed);
    }

    fn render_history(&self, entries: &[TaskSummary]) {
        let now = Utc::now();
        self.line("");
        self.line("your previous comics:");
        for entry in entries {
            let when = time_ago(entry.created_at, now);
            match entry.state {
                TaskState::Completed => {
                    self.line(&format!(
                        "  ✔ {} ({when}) → {}",
                        entry.preview,
                        self.result_url(&entry.id)
                    ));
                }
                TaskState::Processing => {
                    self.line(&format!(
                        "  ⏳ {} ({when}) — still generating, check back soon",
                        entry.preview
                    ));
                }
                TaskState::Pending => {
                    self.line(&format!("  … {} ({when}) — waiting in the queue", entry.preview));
                }
                TaskState::Failed => {
                    self.line(&format!("  ✗ {} ({when}) — failed", entry.preview));
                }
            }
        }
    }

    fn navigate_to_result(&self, task_id: &str) {
        let url = self.result_url(task_id);
        info!("opening result view for task {task_id}");
        self.line(&format!("🎨 your comic is ready: {url}"));
    }
}

/// Relative age label for history entries.
fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = elapsed.num_days();
    if days < 7 {
        return format!("{days}d ago");
    }
    then.format("%Y-%m-%d").to_string()
}
