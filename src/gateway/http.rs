// ABOUTME: HTTP boundary: POST /messages, GET /messages/:id and GET /epoch
// ABOUTME: Thin axum handlers over MessageService; failures render through the gateway error types

use crate::client::CarrierSession;
use crate::gateway::cache::MessageCache;
use crate::gateway::error::{LookupError, SubmissionError};
use crate::gateway::registry::ClientRegistry;
use crate::gateway::service::{MessageRequest, MessageService, SubmissionReceipt};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower_http::trace::TraceLayer;

#[derive(Debug, Serialize)]
pub struct SentMessage {
    pub id: String,
    pub status: u32,
    /// The message text as submitted
    pub otp: String,
    pub carrier_message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<SubmissionReceipt> for SentMessage {
    fn from(receipt: SubmissionReceipt) -> Self {
        Self {
            id: receipt.id,
            status: receipt.status,
            otp: receipt.text,
            carrier_message_id: receipt.carrier_message_id,
            warning: receipt.warning,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StoredMessage {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Epoch {
    pub time: u64,
}

pub fn router<C, R, M>(service: Arc<MessageService<C, R, M>>) -> Router
where
    C: CarrierSession + 'static,
    R: ClientRegistry + 'static,
    M: MessageCache + 'static,
{
    Router::new()
        .route("/messages", post(send_message::<C, R, M>))
        .route("/messages/:id", get(get_message::<C, R, M>))
        .route("/epoch", get(epoch))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn send_message<C, R, M>(
    State(service): State<Arc<MessageService<C, R, M>>>,
    body: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SentMessage>), SubmissionError>
where
    C: CarrierSession,
    R: ClientRegistry,
    M: MessageCache,
{
    let Json(request) =
        body.map_err(|rejection| SubmissionError::InvalidRequestBody(rejection.body_text()))?;
    let receipt = service.submit(request).await?;
    Ok((StatusCode::CREATED, Json(receipt.into())))
}

async fn get_message<C, R, M>(
    State(service): State<Arc<MessageService<C, R, M>>>,
    Path(id): Path<String>,
) -> Result<Json<StoredMessage>, LookupError>
where
    C: CarrierSession,
    R: ClientRegistry,
    M: MessageCache,
{
    let message = service.lookup(&id).await?;
    Ok(Json(StoredMessage { id, message }))
}

async fn epoch() -> Json<Epoch> {
    let time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    Json(Epoch { time })
}
