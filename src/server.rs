use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::export::format_for_tracker;
use crate::extract::{ExtractionError, Extractor};
use crate::models::{ErrorBody, ExtractedWorkout, WorkoutRequest};

const APP_PAGE: &str = include_str!("../static/index.html");

pub fn router(extractor: Extractor) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/health", get(health))
        .route("/app", get(app_page))
        .route("/extract-workout", post(extract_workout))
        .route("/export", post(export))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(extractor)
}

async fn status() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "message": "Workout Formatter API with Transcript Extraction",
        "endpoints": {
            "POST /extract-workout": "Extract workout from YouTube transcript or manual input",
            "POST /export": "Render an extracted workout as plain text for tracking apps",
            "GET /app": "Browser form for the extractor"
        }
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn app_page() -> Html<&'static str> {
    Html(APP_PAGE)
}

async fn extract_workout(
    State(extractor): State<Extractor>,
    payload: Result<Json<WorkoutRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        // A body without a JSON content type carries no fields we can read.
        Err(JsonRejection::MissingJsonContentType(_)) => WorkoutRequest::default(),
        Err(rejection) => {
            return error_response(ExtractionError::MalformedRequest(rejection.body_text()))
        }
    };

    match extractor.extract(&req).await {
        Ok(workout) => (StatusCode::OK, Json(workout)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn export(payload: Result<Json<ExtractedWorkout>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(workout)) => format_for_tracker(&workout).into_response(),
        Err(rejection) => error_response(ExtractionError::MalformedRequest(rejection.body_text())),
    }
}

fn error_response(e: ExtractionError) -> Response {
    let status = match &e {
        ExtractionError::MissingInput
        | ExtractionError::MalformedRequest(_)
        | ExtractionError::InvalidUrl
        | ExtractionError::UnparseableInput => StatusCode::BAD_REQUEST,
        ExtractionError::TranscriptUnavailable(_)
        | ExtractionError::TranscriptTooShort
        | ExtractionError::NoExercisesInTranscript => StatusCode::NOT_FOUND,
        ExtractionError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = ?e, "extraction failed");
    } else {
        tracing::warn!(status = status.as_u16(), error = %e, "extraction rejected");
    }

    let body = ErrorBody {
        error: e.to_string(),
    };
    (status, Json(body)).into_response()
}
