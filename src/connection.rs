// ABOUTME: Provides TCP connection management for SMPP v3.4 protocol communication
// ABOUTME: Implements frame-based I/O with buffering over a single transmitter socket

use crate::codec::CodecError;
use crate::frame::Frame;
use bytes::{Buf, BytesMut};
use std::io::Cursor;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

/// Frame-based transport for an SMPP session.
///
/// ```text
/// CLOSED → OPEN → BOUND_TX → UNBOUND → CLOSED
/// ```
///
/// `Connection` only moves frames; the bind state machine lives in the
/// client.
#[derive(Debug)]
pub struct Connection {
    // Writes are buffered and flushed once per frame.
    stream: BufWriter<TcpStream>,

    // The buffer for reading frames.
    buffer: BytesMut,
}

impl Connection {
    pub fn new(socket: TcpStream) -> Connection {
        Connection {
            stream: BufWriter::new(socket),
            buffer: BytesMut::with_capacity(4 * 1024),
        }
    }

    /// Read a single `Frame` value from the underlying stream.
    ///
    /// Returns `None` when the peer closed the socket on a frame boundary.
    /// A close in the middle of a frame is `CodecError::ConnectionReset`.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>, CodecError> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            // `0` indicates "end of stream".
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(CodecError::ConnectionReset);
            }
        }
    }

    /// Parses one frame off the front of the read buffer if it is complete.
    fn parse_frame(&mut self) -> Result<Option<Frame>, CodecError> {
        let mut buf = Cursor::new(&self.buffer[..]);

        match Frame::check(&mut buf) {
            Ok(len) => {
                let frame = Frame::parse(&self.buffer[..len]);

                // Drop the PDU even when it failed to parse so the stream
                // stays aligned on the next header.
                self.buffer.advance(len);

                frame.map(Some)
            }
            Err(CodecError::Incomplete) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write a single `Frame` to the socket and flush it.
    pub async fn write_frame(&mut self, frame: &Frame) -> Result<(), CodecError> {
        let bytes = frame.to_bytes()?;
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Flush and close the write half.
    pub async fn shutdown(&mut self) -> Result<(), CodecError> {
        self.stream.shutdown().await?;
        Ok(())
    }
}
