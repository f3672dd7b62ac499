// ABOUTME: Message submission pipeline: validate, authenticate, assign an id, encode, submit, cache
// ABOUTME: Plus the lookup path that reads cached text back by identifier

use crate::client::{CarrierSession, SmsMessage};
use crate::gateway::auth::{validate_api_key, AuthError};
use crate::gateway::cache::MessageCache;
use crate::gateway::encoding::TextEncoding;
use crate::gateway::error::{LookupError, SubmissionError};
use crate::gateway::registry::ClientRegistry;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Where the cache key of a sent message comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierPolicy {
    /// The caller's `id`, or a fresh UUID v4. Sent to the carrier as the
    /// receipted_message_id TLV.
    #[default]
    Client,
    /// The message_id from submit_sm_resp; a caller-supplied `id` is ignored
    Carrier,
}

impl FromStr for IdentifierPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(IdentifierPolicy::Client),
            "carrier" => Ok(IdentifierPolicy::Carrier),
            other => Err(format!("expected `client` or `carrier`, got {other:?}")),
        }
    }
}

/// What a failed cache write does to an already-sent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheFailurePolicy {
    #[default]
    Error,
    Warn,
}

impl FromStr for CacheFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(CacheFailurePolicy::Error),
            "warn" => Ok(CacheFailurePolicy::Warn),
            other => Err(format!("expected `error` or `warn`, got {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Sender used when the request leaves `from` empty
    pub default_sender: String,
    pub cache_ttl: Duration,
    pub id_policy: IdentifierPolicy,
    pub cache_failure_policy: CacheFailurePolicy,
}

impl ServiceSettings {
    pub fn new(default_sender: impl Into<String>, cache_ttl: Duration) -> Self {
        Self {
            default_sender: default_sender.into(),
            cache_ttl,
            id_policy: IdentifierPolicy::default(),
            cache_failure_policy: CacheFailurePolicy::default(),
        }
    }
}

/// A send request as the caller describes it. Missing fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageRequest {
    pub id: Option<String>,
    pub from: Option<String>,
    pub to: String,
    pub text_type: Option<String>,
    pub text: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Cache key the text can be looked up under
    pub id: String,
    /// Carrier command_status for the submission
    pub status: u32,
    pub carrier_message_id: String,
    pub text: String,
    /// Set when the message went out but could not be cached
    pub warning: Option<String>,
}

pub struct MessageService<C, R, M> {
    carrier: C,
    registry: R,
    cache: M,
    settings: ServiceSettings,
}

impl<C, R, M> MessageService<C, R, M>
where
    C: CarrierSession,
    R: ClientRegistry,
    M: MessageCache,
{
    pub fn new(carrier: C, registry: R, cache: M, settings: ServiceSettings) -> Self {
        Self {
            carrier,
            registry,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub async fn submit(&self, request: MessageRequest) -> Result<SubmissionReceipt, SubmissionError> {
        if request.to.is_empty() {
            return Err(SubmissionError::InvalidRequestBody(
                "recipient `to` is required".to_string(),
            ));
        }
        if !is_e164(&request.to) {
            return Err(SubmissionError::InvalidPhoneNumber(request.to));
        }

        self.authenticate(&request.api_key).await?;

        let from = match request.from.as_deref() {
            Some(from) if !from.is_empty() => from.to_string(),
            _ => self.settings.default_sender.clone(),
        };

        let client_id = match self.settings.id_policy {
            IdentifierPolicy::Client => Some(
                request
                    .id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
            ),
            IdentifierPolicy::Carrier => None,
        };

        let encoding = TextEncoding::from_label(request.text_type.as_deref().unwrap_or(""));
        let encoded = encoding.encode(&request.text);
        debug!(?encoding, octets = encoded.bytes.len(), "encoded message text");

        let mut message = SmsMessage::new(request.to.as_str(), from, encoded.bytes)
            .with_data_coding(encoded.data_coding);
        if let Some(id) = &client_id {
            message = message.with_correlation_id(id.as_str());
        }

        if !self.carrier.is_connected() {
            return Err(SubmissionError::CarrierNotConnected(
                "SMPP session is down".to_string(),
            ));
        }
        let carrier_receipt = self.carrier.submit(&message).await.map_err(|e| {
            if e.is_connection_lost() {
                SubmissionError::CarrierNotConnected(e.to_string())
            } else {
                SubmissionError::CarrierSubmissionFailed(e.to_string())
            }
        })?;

        let id = match client_id {
            Some(id) => id,
            None if carrier_receipt.message_id.is_empty() => {
                let fallback = Uuid::new_v4().to_string();
                warn!(id = %fallback, "carrier returned an empty message_id, using a generated id");
                fallback
            }
            None => carrier_receipt.message_id.clone(),
        };

        info!(
            id = %id,
            to = %request.to,
            carrier_message_id = %carrier_receipt.message_id,
            "message submitted"
        );

        let warning = match self
            .cache
            .store(&id, &request.text, self.settings.cache_ttl)
            .await
        {
            Ok(()) => None,
            Err(e) => match self.settings.cache_failure_policy {
                CacheFailurePolicy::Error => {
                    return Err(SubmissionError::CachePersistFailed(e.to_string()));
                }
                CacheFailurePolicy::Warn => {
                    warn!(id = %id, error = %e, "message sent but not cached");
                    Some(format!("message sent but not cached: {e}"))
                }
            },
        };

        Ok(SubmissionReceipt {
            id,
            status: carrier_receipt.command_status.code(),
            carrier_message_id: carrier_receipt.message_id,
            text: request.text,
            warning,
        })
    }

    /// Text stored under `id`, while its TTL lasts
    pub async fn lookup(&self, id: &str) -> Result<String, LookupError> {
        match self.cache.fetch(id).await {
            Ok(Some(text)) => Ok(text),
            Ok(None) => Err(LookupError::NotFound),
            Err(e) => Err(LookupError::Cache(e.to_string())),
        }
    }

    async fn authenticate(&self, api_key: &str) -> Result<(), SubmissionError> {
        let clients = self.registry.load_clients().await.map_err(|e| {
            SubmissionError::AuthenticationFailed(AuthError::RegistryUnavailable(e.to_string()))
        })?;
        validate_api_key(api_key, &clients).map_err(SubmissionError::AuthenticationFailed)
    }
}

/// `^\+?[1-9]\d{1,14}$`
fn is_e164(number: &str) -> bool {
    let digits = number.strip_prefix('+').unwrap_or(number).as_bytes();
    matches!(digits.first(), Some(b'1'..=b'9'))
        && (2..=15).contains(&digits.len())
        && digits.iter().all(u8::is_ascii_digit)
}
