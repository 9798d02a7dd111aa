//! services/client/src/bin/client.rs

use std::path::Path;
use std::sync::Arc;

use client_lib::{
    adapters::{
        http_api::HttpGenerationService, terminal::TerminalView, visitor_file::FileVisitorStore,
    },
    config::Config,
    error::ClientError,
    session::{self, poll::PollOutcome, submit::submit, SessionDeps, SharedVisitor, VisitorState},
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!(
        "Configuration loaded. Generation service at {}",
        config.api_base_url
    );

    // --- 2. Initialize Service Adapters ---
    let service = Arc::new(HttpGenerationService::new(config.api_base_url.clone())?);
    let store = Arc::new(FileVisitorStore::new(config.visitor_id_path.clone()));
    let view = Arc::new(TerminalView::new(config.api_base_url.clone()));
    let visitor: SharedVisitor = Arc::new(Mutex::new(VisitorState::default()));

    let deps = SessionDeps {
        service: service.clone(),
        view: view.clone(),
        visitor: visitor.clone(),
    };

    // --- 3. Best-Effort Visitor Bootstrap ---
    // Spawned and forgotten: a failure here must never block submission.
    session::bootstrap::spawn(service, store, view, visitor);

    // --- 4. Run the Form ---
    // One-shot when a note path is given on the command line, interactive
    // otherwise.
    match std::env::args().nth(1) {
        Some(path) => submit_note_file(&deps, Path::new(&path)).await,
        None => interactive_loop(&deps).await,
    }
}

/// Submits the note file named on the command line, once.
async fn submit_note_file(deps: &SessionDeps, path: &Path) -> Result<(), ClientError> {
    let raw_note = tokio::fs::read_to_string(path).await?;
    let note_dir = path.parent().unwrap_or(Path::new("."));
    submit(deps, &raw_note, note_dir).await;
    Ok(())
}

/// The form screen as a loop: prompt, read a note, submit, and come back on
/// any recoverable error. Navigation to a finished comic ends the loop.
async fn interactive_loop(deps: &SessionDeps) -> Result<(), ClientError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        deps.view.show_form();
        let Some(note) = read_note(&mut lines).await? else {
            break;
        };
        if note.trim() == "quit" {
            break;
        }

        // A note that is exactly one line naming a readable file submits
        // that file; anything else is the note text itself.
        let outcome = match tokio::fs::read_to_string(note.trim()).await {
            Ok(raw_note) if !note.contains('\n') => {
                let note_dir = Path::new(note.trim())
                    .parent()
                    .unwrap_or(Path::new("."));
                submit(deps, &raw_note, note_dir).await
            }
            _ => submit(deps, &note, Path::new(".")).await,
        };

        if outcome == Some(PollOutcome::Completed) {
            break;
        }
    }
    Ok(())
}

/// Reads one note from stdin: lines accumulate until an empty line (or EOF)
/// ends the note. `None` means the input stream is gone.
async fn read_note(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>, ClientError> {
    let mut note = String::new();
    loop {
        match lines.next_line().await? {
            None => {
                return Ok(if note.is_empty() { None } else { Some(note) });
            }
            Some(line) => {
                if line.trim().is_empty() {
                    return Ok(Some(note));
                }
                if !note.is_empty() {
                    note.push('\n');
                }
                note.push_str(&line);
            }
        }
    }
}
