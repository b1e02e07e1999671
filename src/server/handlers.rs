use super::{
    lifecycle::{RequestEvent, RequestLifecycle},
    types::{ErrorResponse, IncomingRequest, SkillRequest, SkillResponse},
};
use crate::{
    Error,
    llm::InferenceGateway,
    prompt::select_prompt,
    task::{BackgroundTask, TaskRunner},
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

/// Immediate reply for requests whose answer is delivered through the callback.
pub const PLACEHOLDER_ANSWER: &str = "답변을 찾고 있어요. 잠시만 기다려 주세요!";

type HandlerError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<InferenceGateway>,
    pub runner: TaskRunner,
}

impl AppState {
    pub fn new(runner: TaskRunner) -> Self {
        Self {
            gateway: runner.gateway().clone(),
            runner,
        }
    }
}

pub async fn skill(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SkillResponse>, HandlerError> {
    let span = info_span!("skill_request", request_id = %Uuid::new_v4());
    handle_skill(state, payload).instrument(span).await
}

async fn handle_skill(
    state: AppState,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SkillResponse>, HandlerError> {
    let request = parse_request(payload)?;
    let mut lifecycle = RequestLifecycle::new();

    let response = match request.callback_url {
        None => {
            lifecycle.transition(RequestEvent::NoCallback).map_err(internal)?;
            info!("Answering synchronously");

            let prompt = select_prompt(&request.utterance);
            let answer = state.gateway.infer(&prompt).await;
            SkillResponse::simple_text(answer)
        }
        Some(callback_url) => {
            lifecycle
                .transition(RequestEvent::CallbackPresent)
                .map_err(internal)?;
            info!("Deferring answer to callback {}", callback_url);

            // Detached: nothing awaits the task.
            let _ = state.runner.submit(BackgroundTask {
                utterance: request.utterance,
                callback_url,
            });
            SkillResponse::simple_text(PLACEHOLDER_ANSWER)
        }
    };

    lifecycle
        .transition(RequestEvent::ResponseWritten)
        .map_err(internal)?;
    Ok(Json(response))
}

fn parse_request(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<IncomingRequest, HandlerError> {
    let Json(body) = payload.map_err(|rejection| {
        warn!("Rejected skill request body: {}", rejection.body_text());
        (
            rejection.status(),
            Json(ErrorResponse {
                error: rejection.body_text(),
            }),
        )
    })?;

    debug!(request = %body, "Received skill request");

    let request: SkillRequest = serde_json::from_value(body)
        .map_err(|e| bad_request(Error::malformed(e.to_string())))?;

    IncomingRequest::try_from(request).map_err(bad_request)
}

fn bad_request(e: Error) -> HandlerError {
    warn!("{}", e);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn internal(e: Error) -> HandlerError {
    error!("Request lifecycle error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Processing error: {}", e),
        }),
    )
}
