//! Test utilities for fifty-core
//!
//! A mock LLM server speaking both the Ollama and the OpenAI chat
//! completions protocols, plus fixture builders for goals and records.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::ai::mock::MOCK_INSIGHT_REPLY;
use crate::models::{GoalDefinition, GoalId, PunchRecord};

/// How the mock server answers completion requests
#[derive(Debug, Clone, PartialEq)]
pub enum MockMode {
    /// Well-formed insight JSON
    Valid,
    /// Prose without any JSON object
    Malformed,
    /// Valid reply after a delay
    Slow(Duration),
    /// 500 on every completion request
    Failing,
}

impl MockMode {
    async fn reply(&self) -> Result<String, StatusCode> {
        match self {
            MockMode::Valid => Ok(MOCK_INSIGHT_REPLY.to_string()),
            MockMode::Malformed => Ok("You are doing fine. Keep at it.".to_string()),
            MockMode::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(MOCK_INSIGHT_REPLY.to_string())
            }
            MockMode::Failing => Err(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

/// Mock LLM server for tests
pub struct MockLlmServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start the mock server on an available port
    pub async fn start(mode: MockMode) -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .route("/health", get(|| async { "ok" }))
            .with_state(mode);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLlmServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: vec![ModelInfo {
            name: "llama3.2:latest".to_string(),
        }],
    })
}

async fn handle_generate(
    State(mode): State<MockMode>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, StatusCode> {
    let response = mode.reply().await?;
    Ok(Json(GenerateResponse {
        model: request.model,
        response,
        done: true,
    }))
}

async fn handle_models() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "object": "list",
        "data": [{"id": "deepseek-chat", "object": "model"}]
    }))
}

async fn handle_chat(
    State(mode): State<MockMode>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let content = mode.reply().await?;
    Ok(Json(serde_json::json!({
        "id": "chatcmpl-mock",
        "model": request.model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })))
}

#[derive(Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Serialize)]
struct ModelInfo {
    name: String,
}

#[derive(Deserialize)]
struct GenerateRequest {
    model: String,
}

#[derive(Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}

#[derive(Deserialize)]
struct ChatRequest {
    model: String,
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Goals with ids 1..=n
pub fn goals(labels: &[&str]) -> Vec<GoalDefinition> {
    labels
        .iter()
        .enumerate()
        .map(|(idx, label)| GoalDefinition::new(idx as GoalId + 1, *label))
        .collect()
}

/// The default seven challenge goals
pub fn seven_goals() -> Vec<GoalDefinition> {
    goals(&[
        "Wake early",
        "Exercise",
        "Read",
        "Meditate",
        "Study",
        "Eat healthy",
        "Write",
    ])
}

/// `days` consecutive records starting at `start`; `outcome(day_index, goal)`
/// decides each entry
pub fn records(
    start: NaiveDate,
    days: u32,
    goals: &[GoalDefinition],
    outcome: impl Fn(u32, &GoalDefinition) -> bool,
) -> Vec<PunchRecord> {
    (0..days)
        .map(|day| {
            let date = start + chrono::Duration::days(day as i64);
            PunchRecord::from_pairs(
                date.to_string(),
                goals.iter().map(|g| (g.id, outcome(day, g))),
            )
        })
        .collect()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
