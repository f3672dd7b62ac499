// ABOUTME: Core SMPP client traits using native async functions for modern Rust implementations
// ABOUTME: Separates raw connection handling, session operations and the shared carrier seam

use crate::client::error::SmppResult;
use crate::client::types::{BindCredentials, SmsMessage, SubmitReceipt};
use crate::datatypes::SubmitSm;
use std::future::Future;
use tokio::net::ToSocketAddrs;

/// Base connection management for SMPP clients
pub trait SmppConnection {
    /// Open the TCP connection to the SMSC
    async fn connect<T: ToSocketAddrs>(addr: T) -> SmppResult<Self>
    where
        Self: Sized;

    /// Close the TCP connection. Call after `unbind`.
    async fn disconnect(&mut self) -> SmppResult<()>;

    fn is_connected(&self) -> bool;
}

/// Core SMPP session operations
pub trait SmppClient: SmppConnection {
    /// bind_transmitter and wait for the response
    async fn bind(&mut self, credentials: &BindCredentials) -> SmppResult<()>;

    /// Send unbind and wait for unbind_resp
    async fn unbind(&mut self) -> SmppResult<()>;

    /// Send enquire_link and wait for enquire_link_resp
    async fn enquire_link(&mut self) -> SmppResult<()>;

    /// Next sequence number for an outbound request. Never 0.
    fn next_sequence_number(&mut self) -> u32;
}

/// SMPP transmitter client operations
pub trait SmppTransmitter: SmppClient {
    /// Submit a message built from the high-level `SmsMessage`
    async fn send_sms(&mut self, message: &SmsMessage) -> SmppResult<SubmitReceipt>;

    /// Submit a fully constructed submit_sm
    async fn submit_sm(&mut self, submit: &SubmitSm) -> SmppResult<SubmitReceipt>;
}

/// A shared, already-bound carrier link that many tasks submit through.
///
/// The returned futures are `Send` so the trait can be used behind axum
/// handlers.
pub trait CarrierSession: Send + Sync {
    fn submit(&self, message: &SmsMessage)
        -> impl Future<Output = SmppResult<SubmitReceipt>> + Send;

    fn is_connected(&self) -> bool;
}
