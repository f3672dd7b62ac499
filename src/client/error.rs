// ABOUTME: SMPP client error types for the transmitter session
// ABOUTME: Wraps codec, I/O and protocol failures and tells callers when the link itself is gone

use crate::codec::CodecError;
use crate::datatypes::CommandStatus;
use std::io;
use thiserror::Error;

/// Error type for SMPP client operations
#[derive(Debug, Error)]
pub enum SmppError {
    /// I/O error during network operations (connection, read, write)
    #[error("Connection error: {0}")]
    Connection(#[from] io::Error),

    /// Malformed PDU on the wire or a field that can't be encoded
    #[error("Codec error: {0}")]
    Codec(CodecError),

    /// SMPP protocol error indicated by command_status field
    #[error("Protocol error: {0:?} ({code:#010x})", code = .0.code())]
    Protocol(CommandStatus),

    /// The SMSC answered with generic_nack instead of the expected response
    #[error("generic_nack: {0:?}")]
    GenericNack(CommandStatus),

    /// Data validation error (message too long, bad address, etc.)
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// No response within the configured response timeout
    #[error("Operation timeout")]
    Timeout,

    /// The response timeout fired with a PDU only partly written
    #[error("Timed out writing a PDU")]
    WriteTimeout,

    /// Unexpected PDU received (wrong response type for request)
    #[error("Unexpected PDU: expected {expected}, got {actual}")]
    UnexpectedPdu { expected: String, actual: String },

    /// Connection closed by the SMSC
    #[error("Connection closed unexpectedly")]
    ConnectionClosed,

    /// The session was torn down earlier and nothing can be sent on it
    #[error("SMPP session is not connected")]
    NotConnected,
}

/// Result type alias for SMPP operations
pub type SmppResult<T> = Result<T, SmppError>;

impl From<CodecError> for SmppError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Io(e) => SmppError::Connection(e),
            CodecError::ConnectionReset => SmppError::ConnectionClosed,
            other => SmppError::Codec(other),
        }
    }
}

impl SmppError {
    /// True when the TCP link itself is gone. Late responses after a
    /// timeout are discarded by sequence number, so a timeout is not fatal.
    pub fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            SmppError::Connection(_)
                | SmppError::ConnectionClosed
                | SmppError::NotConnected
                | SmppError::WriteTimeout
        )
    }
}
