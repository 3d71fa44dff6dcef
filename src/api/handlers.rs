//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::sse::sse_stream;
use super::types::{
    ActionResponse, ChatRequest, ChatResponse, ConversationResponse, ErrorResponse,
    PersonaResponse, SuggestionRequest,
};
use super::AppState;
use crate::session::SessionError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the chat page
        .route("/", get(serve_index))
        .route("/assets/*path", get(serve_static))
        // Conversation state
        .route("/api/conversation", get(get_conversation))
        .route("/api/conversation/stream", get(stream_conversation))
        // User actions
        .route("/api/conversation/chat", post(send_chat))
        .route("/api/conversation/suggestion", post(send_suggestion))
        .route("/api/conversation/cancel", post(cancel_turn))
        .route("/api/conversation/sidebar", post(toggle_sidebar))
        // Deployment info
        .route("/api/persona", get(get_persona))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Page
// ============================================================

async fn serve_index() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

// ============================================================
// Conversation State
// ============================================================

async fn get_conversation(State(state): State<AppState>) -> Json<ConversationResponse> {
    Json(state.store.snapshot().into())
}

async fn stream_conversation(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before the snapshot so no change falls between the two
    let events_rx = state.store.subscribe();
    let init = ConversationResponse::from(state.store.snapshot());
    sse_stream(init, events_rx)
}

// ============================================================
// User Actions
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    state.session.submit_text(&req.text).await?;
    Ok(Json(ChatResponse { queued: true }))
}

async fn send_suggestion(
    State(state): State<AppState>,
    Json(req): Json<SuggestionRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    state.session.select_suggestion(req.index).await?;
    Ok(Json(ChatResponse { queued: true }))
}

async fn cancel_turn(State(state): State<AppState>) -> Result<Json<ActionResponse>, AppError> {
    state.session.cancel().await?;
    Ok(Json(ActionResponse { ok: true }))
}

async fn toggle_sidebar(State(state): State<AppState>) -> Result<Json<ActionResponse>, AppError> {
    state.session.toggle_sidebar().await?;
    Ok(Json(ActionResponse { ok: true }))
}

// ============================================================
// Deployment Info
// ============================================================

async fn get_persona(State(state): State<AppState>) -> Json<PersonaResponse> {
    Json(PersonaResponse {
        id: state.persona.id(),
        name: state.persona.display_name(),
        model: state.model_id.clone(),
        starters: state.persona.starters(),
    })
}

async fn get_version() -> &'static str {
    concat!("salom-ai ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unavailable(String),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::EmptyInput => AppError::BadRequest(message),
            SessionError::Busy => AppError::Conflict(message),
            SessionError::NoSuchSuggestion(_) => AppError::NotFound(message),
            SessionError::RuntimeStopped => AppError::Unavailable(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
