use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::stream::StreamExt;

use crate::application::ports::GenerationRequest;
use crate::infrastructure::observability::redact_query;
use crate::presentation::state::AppState;

pub const MISSING_QUERY_MESSAGE: &str = "Missing 'query' in request body";

/// Streams the model's reply to `query` as unframed `text/plain` chunks.
#[tracing::instrument(skip_all)]
pub async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Malformed generate request");
            return rejection.into_response();
        }
    };

    let query = request.query.trim();
    if query.is_empty() {
        tracing::warn!("Generate request without a query");
        return (StatusCode::BAD_REQUEST, MISSING_QUERY_MESSAGE).into_response();
    }

    tracing::debug!(query = %redact_query(query), "Generating reply");

    match state.llm_client.complete_stream(query).await {
        Ok(tokens) => {
            let tokens = tokens.inspect(|token| {
                if let Err(e) = token {
                    tracing::error!(error = %e, "Upstream failed mid-reply, aborting body");
                }
            });
            (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                Body::from_stream(tokens),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Upstream generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server error: {}", e),
            )
                .into_response()
        }
    }
}
