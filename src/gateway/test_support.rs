// ABOUTME: Test doubles for the carrier session and the message cache
// ABOUTME: FakeCarrier records submissions with a scripted outcome; FailingCache errors on every call

//! Fakes for the service's collaborators.

use crate::client::{CarrierSession, SmppError, SmppResult, SmsMessage, SubmitReceipt};
use crate::datatypes::CommandStatus;
use crate::gateway::cache::{CacheError, MessageCache};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum CarrierOutcome {
    Accept(String),
    Reject(CommandStatus),
    Lost,
}

/// Carrier that records every message it is handed.
#[derive(Debug)]
pub struct FakeCarrier {
    outcome: CarrierOutcome,
    connected: AtomicBool,
    pub sent: Mutex<Vec<SmsMessage>>,
}

impl FakeCarrier {
    pub fn accepting(message_id: &str) -> Self {
        Self::with_outcome(CarrierOutcome::Accept(message_id.to_string()))
    }

    pub fn with_outcome(outcome: CarrierOutcome) -> Self {
        Self {
            outcome,
            connected: AtomicBool::new(true),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn disconnected() -> Self {
        let carrier = Self::accepting("unused");
        carrier.connected.store(false, Ordering::SeqCst);
        carrier
    }

    pub fn sent(&self) -> Vec<SmsMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl CarrierSession for FakeCarrier {
    async fn submit(&self, message: &SmsMessage) -> SmppResult<SubmitReceipt> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(SmppError::NotConnected);
        }
        self.sent.lock().unwrap().push(message.clone());

        match &self.outcome {
            CarrierOutcome::Accept(id) => Ok(SubmitReceipt {
                message_id: id.clone(),
                command_status: CommandStatus::Ok,
            }),
            CarrierOutcome::Reject(status) => Err(SmppError::Protocol(*status)),
            CarrierOutcome::Lost => Err(SmppError::ConnectionClosed),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Cache whose every operation fails
#[derive(Debug, Default)]
pub struct FailingCache;

impl MessageCache for FailingCache {
    async fn store(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn fetch(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}
