//! HTTP request handlers

use super::state::AppState;
use crate::error::PipelineError;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Question parameters, from the query string or a JSON body
#[derive(Debug, Default, Deserialize)]
pub struct AskParams {
    #[serde(default)]
    pub q: String,
}

/// Body returned when a run fails
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub stage: String,
}

/// `GET /ask?q=...`
pub async fn ask_get(State(state): State<AppState>, Query(params): Query<AskParams>) -> Response {
    ask(&state, &params.q).await
}

/// `POST /ask` with `{"q": "..."}`
pub async fn ask_post(State(state): State<AppState>, Json(params): Json<AskParams>) -> Response {
    ask(&state, &params.q).await
}

async fn ask(state: &AppState, question: &str) -> Response {
    state.metrics.inc_run();
    info!("Question received: {:?}", question);

    match state.pipeline.research(question).await {
        Ok(research) => {
            state.metrics.record_success(&research);
            Json(research).into_response()
        }
        Err(e) => {
            state.metrics.record_failure(e.stage());
            error!("Run failed at {}: {}", e.stage(), e);
            let status = match e {
                PipelineError::EmptyQuestion => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            let body = ErrorResponse {
                error: e.to_string(),
                stage: e.stage().to_string(),
            };
            (status, Json(body)).into_response()
        }
    }
}

/// Pipeline metrics
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "engine": state.settings.search.engine,
        "source_count": state.settings.search.source_count
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::llm::CompletionRequest;
    use crate::pipeline::testing::{FixedRetriever, MemoryExtractor, ScriptedGenerator};
    use crate::pipeline::{Pipeline, Research, CONDENSE_PROMPT, SEARCH_QUERY_PROMPT};
    use axum::body::to_bytes;
    use std::sync::Arc;

    fn state(retriever: FixedRetriever) -> AppState {
        let generator = ScriptedGenerator::new(|request: &CompletionRequest| {
            match request.system_prompt() {
                Some(SEARCH_QUERY_PROMPT) => Ok("capital of France".to_string()),
                Some(CONDENSE_PROMPT) => Ok("Paris is the capital of France.".to_string()),
                _ => Ok("Paris [1].".to_string()),
            }
        });
        let settings = Settings::default();
        let pipeline = Pipeline::new(
            Arc::new(generator),
            Arc::new(retriever),
            Arc::new(MemoryExtractor::new().page("https://en.wikipedia.org/Paris", "Paris.")),
            &settings,
        );
        AppState::new(settings, pipeline)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ask_returns_research() {
        let state = state(FixedRetriever::links(&["https://en.wikipedia.org/Paris"]));
        let response = ask_get(
            State(state.clone()),
            Query(AskParams {
                q: "What is the capital of France?".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let research: Research = body_json(response).await;
        assert_eq!(research.search_query, "capital of France");
        assert_eq!(
            research.answer,
            "Paris <sup>[[1]](https://en.wikipedia.org/Paris)</sup>."
        );
        assert_eq!(research.sources[0].result_number, 1);

        let snapshot = state.metrics.snapshot();
        assert_eq!(snapshot.runs, 1);
        assert_eq!(snapshot.successes, 1);
        assert_eq!(snapshot.sources_kept, 1);
    }

    #[tokio::test]
    async fn test_health_reports_configuration() {
        let state = state(FixedRetriever::links(&[]));
        let response = health(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["engine"], "google");
        assert_eq!(body["source_count"], 5);
    }

    #[tokio::test]
    async fn test_empty_question_is_bad_request() {
        let state = state(FixedRetriever::links(&[]));
        let response = ask_post(State(state), Json(AskParams::default())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = body_json(response).await;
        assert_eq!(body.stage, "input");
    }

    #[tokio::test]
    async fn test_search_failure_is_bad_gateway() {
        let state = state(FixedRetriever::failing());
        let response = ask_post(
            State(state.clone()),
            Json(AskParams {
                q: "anything".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body: ErrorResponse = body_json(response).await;
        assert_eq!(body.stage, "search");
        assert!(body.error.starts_with("search unavailable"));
        assert_eq!(state.metrics.snapshot().failures.get("search"), Some(&1));
    }
}
