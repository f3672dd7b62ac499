// ABOUTME: Default SMPP transmitter client implementing the connection, session and submit traits
// ABOUTME: Matches responses by sequence number and answers SMSC-initiated PDUs while waiting

use crate::client::error::{SmppError, SmppResult};
use crate::client::traits::{SmppClient, SmppConnection, SmppTransmitter};
use crate::client::types::{BindCredentials, SmsMessage, SubmitReceipt};
use crate::connection::Connection;
use crate::datatypes::*;
use crate::frame::Frame;
use std::time::Duration;
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, warn};

const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default SMPP transmitter client.
///
/// Every request waits for the response carrying its own sequence number.
/// Responses to earlier, abandoned requests are dropped; enquire_link and
/// unbind from the SMSC are answered in place.
pub struct DefaultClient {
    connection: Connection,
    sequence_number: u32,
    connected: bool,
    // Set while a PDU is going out; still set if the write was cancelled
    mid_write: bool,
    response_timeout: Duration,
}

impl DefaultClient {
    /// Wraps an already connected socket
    pub fn from_stream(socket: TcpStream) -> Self {
        DefaultClient {
            connection: Connection::new(socket),
            sequence_number: 0,
            connected: true,
            mid_write: false,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }

    /// How long one request may take, write included, before it fails
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Writes `request` and waits for the response with the same sequence
    /// number. Clears the connected flag if the link breaks.
    async fn exchange(&mut self, request: Frame) -> SmppResult<Frame> {
        if !self.connected {
            return Err(SmppError::NotConnected);
        }

        let result = self.send_and_wait(request).await;
        if let Err(e) = &result {
            if e.is_connection_lost() {
                warn!(error = %e, "SMPP connection lost");
                self.connected = false;
            }
        }
        result
    }

    async fn send_and_wait(&mut self, request: Frame) -> SmppResult<Frame> {
        let sequence_number = request.sequence_number();
        let limit = self.response_timeout;
        let exchange = async {
            self.write(&request).await?;
            self.await_response(sequence_number).await
        };

        match tokio::time::timeout(limit, exchange).await {
            Ok(result) => result,
            // A partly written PDU leaves the stream misaligned
            Err(_) if self.mid_write => Err(SmppError::WriteTimeout),
            Err(_) => Err(SmppError::Timeout),
        }
    }

    async fn write(&mut self, frame: &Frame) -> SmppResult<()> {
        self.mid_write = true;
        let result = self.connection.write_frame(frame).await;
        self.mid_write = false;
        Ok(result?)
    }

    async fn await_response(&mut self, sequence_number: u32) -> SmppResult<Frame> {
        loop {
            let frame = match self.connection.read_frame().await? {
                Some(frame) => frame,
                None => return Err(SmppError::ConnectionClosed),
            };

            match frame {
                Frame::EnquireLink(probe) => {
                    debug!(seq = probe.sequence_number, "answering SMSC enquire_link");
                    let resp = Frame::EnquireLinkResp(EnquireLinkResponse::new(probe.sequence_number));
                    self.write(&resp).await?;
                }
                Frame::Unbind(unbind) => {
                    warn!(seq = unbind.sequence_number, "SMSC requested unbind");
                    let resp = Frame::UnbindResp(UnbindResponse::new(unbind.sequence_number));
                    self.write(&resp).await?;
                    return Err(SmppError::ConnectionClosed);
                }
                Frame::GenericNack(nack)
                    if nack.sequence_number == sequence_number || nack.sequence_number == 0 =>
                {
                    return Err(SmppError::GenericNack(nack.command_status));
                }
                frame if frame.is_response() => {
                    if frame.sequence_number() == sequence_number {
                        return Ok(frame);
                    }
                    debug!(
                        seq = frame.sequence_number(),
                        expected = sequence_number,
                        command_id = ?frame.command_id(),
                        "discarding stale response"
                    );
                }
                other => {
                    // A transmitter accepts no other requests
                    warn!(command_id = ?other.command_id(), "rejecting SMSC request with generic_nack");
                    let nack = Frame::GenericNack(GenericNack::invalid_command_id(
                        other.sequence_number(),
                    ));
                    self.write(&nack).await?;
                }
            }
        }
    }
}

impl SmppConnection for DefaultClient {
    async fn connect<T: ToSocketAddrs>(addr: T) -> SmppResult<Self> {
        let socket = TcpStream::connect(addr).await?;
        socket.set_nodelay(true)?;

        Ok(DefaultClient::from_stream(socket))
    }

    async fn disconnect(&mut self) -> SmppResult<()> {
        self.connected = false;
        self.connection.shutdown().await?;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

impl SmppClient for DefaultClient {
    async fn bind(&mut self, credentials: &BindCredentials) -> SmppResult<()> {
        let sequence_number = self.next_sequence_number();
        let bind = BindTransmitter::new(
            sequence_number,
            credentials.system_id.as_str(),
            credentials.password.as_str(),
            credentials.system_type.as_str(),
        );

        match self.exchange(Frame::BindTransmitter(bind)).await? {
            Frame::BindTransmitterResp(resp) => {
                if !resp.command_status.is_ok() {
                    return Err(SmppError::Protocol(resp.command_status));
                }
                debug!(smsc = %resp.system_id, "bound as transmitter");
                Ok(())
            }
            other => Err(SmppError::UnexpectedPdu {
                expected: "bind_transmitter_resp".to_string(),
                actual: format!("{:?}", other.command_id()),
            }),
        }
    }

    async fn unbind(&mut self) -> SmppResult<()> {
        let sequence_number = self.next_sequence_number();
        let result = self
            .exchange(Frame::Unbind(Unbind::new(sequence_number)))
            .await;
        self.connected = false;

        match result {
            Ok(Frame::UnbindResp(resp)) if !resp.command_status.is_ok() => {
                Err(SmppError::Protocol(resp.command_status))
            }
            Ok(Frame::UnbindResp(_)) => Ok(()),
            Ok(other) => Err(SmppError::UnexpectedPdu {
                expected: "unbind_resp".to_string(),
                actual: format!("{:?}", other.command_id()),
            }),
            // The SMSC may drop the socket instead of answering
            Err(SmppError::ConnectionClosed) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn enquire_link(&mut self) -> SmppResult<()> {
        let sequence_number = self.next_sequence_number();
        match self
            .exchange(Frame::EnquireLink(EnquireLink::new(sequence_number)))
            .await?
        {
            Frame::EnquireLinkResp(resp) if resp.command_status.is_ok() => Ok(()),
            Frame::EnquireLinkResp(resp) => Err(SmppError::Protocol(resp.command_status)),
            other => Err(SmppError::UnexpectedPdu {
                expected: "enquire_link_resp".to_string(),
                actual: format!("{:?}", other.command_id()),
            }),
        }
    }

    fn next_sequence_number(&mut self) -> u32 {
        // Valid range is 0x00000001..=0x7FFFFFFF
        self.sequence_number = if self.sequence_number >= 0x7FFF_FFFF {
            1
        } else {
            self.sequence_number + 1
        };
        self.sequence_number
    }
}

impl SmppTransmitter for DefaultClient {
    async fn send_sms(&mut self, message: &SmsMessage) -> SmppResult<SubmitReceipt> {
        let sequence_number = self.next_sequence_number();
        let submit = message.to_submit_sm(sequence_number)?;
        self.submit_sm(&submit).await
    }

    async fn submit_sm(&mut self, submit: &SubmitSm) -> SmppResult<SubmitReceipt> {
        match self.exchange(Frame::SubmitSm(Box::new(submit.clone()))).await? {
            Frame::SubmitSmResp(resp) => {
                if !resp.command_status.is_ok() {
                    return Err(SmppError::Protocol(resp.command_status));
                }
                Ok(SubmitReceipt {
                    message_id: resp.message_id,
                    command_status: resp.command_status,
                })
            }
            other => Err(SmppError::UnexpectedPdu {
                expected: "submit_sm_resp".to_string(),
                actual: format!("{:?}", other.command_id()),
            }),
        }
    }
}
