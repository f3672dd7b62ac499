// ABOUTME: Shared SMPP transmitter session used by every request handler
// ABOUTME: Serialises exchanges behind an async mutex and runs the enquire_link keep-alive task

use crate::client::default::DefaultClient;
use crate::client::error::{SmppError, SmppResult};
use crate::client::keepalive::{KeepAliveConfig, KeepAliveManager};
use crate::client::traits::{CarrierSession, SmppClient, SmppConnection, SmppTransmitter};
use crate::client::types::{BindCredentials, SmsMessage, SubmitReceipt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::net::ToSocketAddrs;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Bound on connect and on every request/response exchange
    pub response_timeout: Duration,
    pub keep_alive: KeepAliveConfig,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            response_timeout: Duration::from_secs(10),
            keep_alive: KeepAliveConfig::default(),
        }
    }
}

/// A bound transmitter session shared by all submitters.
///
/// Cloning is cheap. Once the link is lost the session stays down and every
/// submit fails with `SmppError::NotConnected`.
#[derive(Clone)]
pub struct SmppSession {
    inner: Arc<Inner>,
}

struct Inner {
    client: Mutex<DefaultClient>,
    connected: AtomicBool,
    keep_alive: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn mark_disconnected(&self, reason: &str) {
        if self.connected.swap(false, Ordering::SeqCst) {
            error!(reason, "SMPP session is down");
        }
    }
}

impl SmppSession {
    /// Connects, binds as transmitter and starts the keep-alive task.
    pub async fn establish<A: ToSocketAddrs>(
        addr: A,
        credentials: &BindCredentials,
        options: SessionOptions,
    ) -> SmppResult<Self> {
        let mut client = tokio::time::timeout(options.response_timeout, DefaultClient::connect(addr))
            .await
            .map_err(|_| SmppError::Timeout)??
            .with_response_timeout(options.response_timeout);

        client.bind(credentials).await?;
        info!(system_id = %credentials.system_id, "SMPP transmitter bound");

        let inner = Arc::new(Inner {
            client: Mutex::new(client),
            connected: AtomicBool::new(true),
            keep_alive: std::sync::Mutex::new(None),
        });

        if options.keep_alive.enabled && !options.keep_alive.interval.is_zero() {
            let handle = tokio::spawn(run_keep_alive(Arc::downgrade(&inner), options.keep_alive));
            if let Ok(mut slot) = inner.keep_alive.lock() {
                *slot = Some(handle);
            }
        }

        Ok(Self { inner })
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    /// Stops keep-alive, unbinds and closes the socket.
    pub async fn shutdown(&self) {
        let handle = self
            .inner
            .keep_alive
            .lock()
            .ok()
            .and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            handle.abort();
        }

        let mut client = self.inner.client.lock().await;
        if self.inner.connected.swap(false, Ordering::SeqCst) {
            if let Err(e) = client.unbind().await {
                warn!(error = %e, "unbind failed");
            }
        }
        if let Err(e) = client.disconnect().await {
            debug!(error = %e, "socket shutdown failed");
        }
        info!("SMPP session closed");
    }
}

impl CarrierSession for SmppSession {
    async fn submit(&self, message: &SmsMessage) -> SmppResult<SubmitReceipt> {
        if !self.is_connected() {
            return Err(SmppError::NotConnected);
        }

        let mut client = self.inner.client.lock().await;
        let result = client.send_sms(message).await;
        if !client.is_connected() {
            self.inner.mark_disconnected("connection lost during submit_sm");
        }
        result
    }

    fn is_connected(&self) -> bool {
        SmppSession::is_connected(self)
    }
}

async fn run_keep_alive(session: Weak<Inner>, config: KeepAliveConfig) {
    let mut manager = KeepAliveManager::new(config);

    loop {
        tokio::time::sleep(manager.time_until_next_ping()).await;

        let Some(inner) = session.upgrade() else {
            return;
        };
        if !inner.connected.load(Ordering::SeqCst) {
            return;
        }
        if !manager.should_ping() {
            continue;
        }

        let mut client = inner.client.lock().await;
        manager.on_ping_sent();
        match client.enquire_link().await {
            Ok(()) => manager.on_ping_success(),
            Err(e) => {
                manager.on_ping_failure();
                if e.is_connection_lost() {
                    inner.mark_disconnected("connection lost during enquire_link");
                    return;
                }
            }
        }
        drop(client);

        if manager.is_connection_failed() {
            inner.mark_disconnected("enquire_link failure budget exhausted");
            return;
        }
    }
}
