use crate::agent::ChatAgent;
use crate::error::{ ChatError, PROCESSING_FAILED };
use crate::models::chat::{ ChatReply, HealthStatus, HistoryResponse, StatusMessage };
use std::error::Error;
use std::time::Instant;
use axum::{
    body::Bytes,
    routing::{ get, post },
    Router,
    Json,
    extract::State,
    http::{ header, HeaderValue, Method, StatusCode },
    response::{ IntoResponse, Response },
};
use chrono::Utc;
use serde_json::{ json, Value as JsonValue };
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{ Any, CorsLayer };
use log::{ error, info, warn };

#[derive(Clone)]
pub struct AppState {
    agent: ChatAgent,
    started_at: Instant,
}

impl AppState {
    pub fn new(agent: ChatAgent) -> Self {
        Self { agent, started_at: Instant::now() }
    }
}

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.iter().any(|o| o == "*") {
        warn!("CORS allows any origin");
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(allowed)
}

/// Turns a handler panic into the same 500 body as any other internal failure.
fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    error!("Handler panicked: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": PROCESSING_FAILED, "message": detail })),
    ).into_response()
}

// CORS sits outside the panic guard so 500s still carry the allow-origin header.
fn with_layers<S>(app: Router<S>, origins: &[String]) -> Router<S>
    where S: Clone + Send + Sync + 'static
{
    app.layer(CatchPanicLayer::custom(panic_response)).layer(cors_layer(origins))
}

pub fn router(state: AppState, origins: &[String]) -> Router {
    let app = Router::new()
        .route("/chat", post(chat_handler))
        .route("/chat/history", get(history_handler).delete(clear_history_handler))
        .route("/health", get(health_handler));
    with_layers(app, origins).with_state(state)
}

pub async fn start_http_server(
    addr: &str,
    agent: ChatAgent,
    origins: &[String],
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = router(AppState::new(agent), origins);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e)
    })?;
    info!("HTTP server listening on: http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down server...");
}

/// Pulls a string `message` out of the raw body. A body that is not JSON, or
/// has no string `message`, counts as a missing field.
fn extract_message(body: &[u8]) -> Result<String, ChatError> {
    let value: JsonValue = serde_json::from_slice(body).map_err(|_| ChatError::MissingMessage)?;
    match value.get("message") {
        Some(JsonValue::String(message)) => Ok(message.clone()),
        _ => Err(ChatError::MissingMessage),
    }
}

async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatReply>, ChatError> {
    let message = extract_message(&body)?;
    let reply = state.agent.process_message(&message).await?;
    Ok(Json(ChatReply { reply }))
}

async fn history_handler(
    State(state): State<AppState>,
) -> Result<Json<HistoryResponse>, ChatError> {
    let history = state.agent.history().await?;
    Ok(Json(HistoryResponse { history }))
}

async fn clear_history_handler(
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, ChatError> {
    state.agent.clear_history().await?;
    Ok(Json(StatusMessage { message: "History cleared".into() }))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".into(),
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
