//! services/client/src/adapters/http_api.rs
//!
//! The HTTP adapter for the remote comic-generation service. It implements
//! the `GenerationService` port from the `core` crate; all wire DTOs live
//! here, private to the adapter.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meeting_comic_core::domain::{
    GenerationRequest, SubmissionReceipt, TaskState, TaskStatusReport, TaskSummary, VisitorProfile,
};
use meeting_comic_core::ports::{GenerationService, PortError, PortResult};
use reqwest::multipart;
use serde::{Deserialize, Serialize};

/// Per-request network timeout. Generous: creation requests upload images.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Talks to the generation service over HTTP.
#[derive(Clone)]
pub struct HttpGenerationService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGenerationService {
    /// Creates the adapter for a service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> PortResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(network_error)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a non-2xx response into `Rejected`, pulling the server's
    /// `detail` field when the body carries one.
    async fn rejection(response: reqwest::Response, fallback: &str) -> PortError {
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| fallback.to_string());
        PortError::Rejected(detail)
    }
}

//=========================================================================================
// "Impure" Wire Record Structs
//=========================================================================================

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VisitorBody {
    id: String,
    nickname: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    meeting_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    visitor_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponseBody {
    task: TaskRefBody,
    #[serde(default)]
    messages: Vec<String>,
    nickname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskRefBody {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: WireTaskState,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryBody {
    #[serde(default)]
    tasks: Vec<HistoryTaskBody>,
}

#[derive(Debug, Deserialize)]
struct HistoryTaskBody {
    id: String,
    status: WireTaskState,
    created_at: DateTime<Utc>,
    meeting_text_preview: String,
    thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireTaskState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl From<WireTaskState> for TaskState {
    fn from(state: WireTaskState) -> Self {
        match state {
            WireTaskState::Pending => TaskState::Pending,
            WireTaskState::Processing => TaskState::Processing,
            WireTaskState::Completed => TaskState::Completed,
            WireTaskState::Failed => TaskState::Failed,
        }
    }
}

impl From<HistoryTaskBody> for TaskSummary {
    fn from(body: HistoryTaskBody) -> Self {
        TaskSummary {
            id: body.id,
            state: body.status.into(),
            created_at: body.created_at,
            preview: body.meeting_text_preview,
            thumbnail_url: body.thumbnail_url,
        }
    }
}

//=========================================================================================
// Port Implementation
//=========================================================================================

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn register_visitor(&self, existing_id: Option<&str>) -> PortResult<VisitorProfile> {
        let mut request = self.client.post(self.url("/visitor"));
        if let Some(id) = existing_id {
            request = request.query(&[("id", id)]);
        }
        let response = request.send().await.map_err(network_error)?;
        if !response.status().is_success() {
            return Err(Self::rejection(response, "visitor registration refused").await);
        }
        let body: VisitorBody = response.json().await.map_err(network_error)?;
        Ok(VisitorProfile {
            id: body.id,
            nickname: body.nickname,
        })
    }

    async fn history(&self, visitor_id: &str) -> PortResult<Vec<TaskSummary>> {
        let response = self
            .client
            .get(self.url(&format!("/history/{visitor_id}")))
            .send()
            .await
            .map_err(network_error)?;
        if !response.status().is_success() {
            return Err(Self::rejection(response, "history unavailable").await);
        }
        let body: HistoryBody = response.json().await.map_err(network_error)?;
        Ok(body.tasks.into_iter().map(TaskSummary::from).collect())
    }

    async fn submit(&self, request: GenerationRequest) -> PortResult<SubmissionReceipt> {
        let GenerationRequest {
            meeting_text,
            visitor_id,
            images,
        } = request;

        // Text-only submissions go out as JSON; anything carrying images
        // becomes a multipart upload.
        let response = if images.is_empty() {
            let body = GenerateBody {
                meeting_text: &meeting_text,
                visitor_id: visitor_id.as_deref(),
            };
            self.client
                .post(self.url("/generate"))
                .json(&body)
                .send()
                .await
                .map_err(network_error)?
        } else {
            let mut form = multipart::Form::new().text("meeting_text", meeting_text);
            if let Some(id) = visitor_id {
                form = form.text("visitor_id", id);
            }
            for image in images {
                let part = multipart::Part::bytes(image.bytes)
                    .file_name(image.file_name)
                    .mime_str(&image.media_type)
                    .map_err(network_error)?;
                form = form.part("images", part);
            }
            self.client
                .post(self.url("/generate-with-images"))
                .multipart(form)
                .send()
                .await
                .map_err(network_error)?
        };

        if !response.status().is_success() {
            return Err(Self::rejection(response, "the generation request failed").await);
        }
        let body: GenerateResponseBody = response.json().await.map_err(network_error)?;
        Ok(SubmissionReceipt {
            task_id: body.task.id,
            rotation_hints: body.messages,
            nickname: body.nickname,
        })
    }

    async fn task_status(&self, task_id: &str) -> PortResult<TaskStatusReport> {
        let response = self
            .client
            .get(self.url(&format!("/status/{task_id}")))
            .send()
            .await
            .map_err(network_error)?;
        if !response.status().is_success() {
            return Err(Self::rejection(response, "status check refused").await);
        }
        let body: StatusBody = response.json().await.map_err(network_error)?;
        Ok(TaskStatusReport {
            state: body.status.into(),
            error_message: body.error_message,
        })
    }
}

fn network_error(err: reqwest::Error) -> PortError {
    PortError::Network(err.to_string())
}
