//! SMS gateway: an HTTP front end that authenticates callers, encodes their
//! text and submits it to a carrier over SMPP v3.4, keeping the text in a
//! short-lived cache for lookup by message id.
//!
//! The SMPP side (`codec`, `frame`, `connection`, `client`) is usable on its
//! own as a transmitter-only client.

pub mod client;
pub mod codec;
pub mod connection;
pub mod datatypes;
pub mod frame;
pub mod gateway;

mod macros;


pub use codec::{CodecError, Decodable, Encodable, PduHeader};
pub use frame::Frame;

pub use client::{
    BindCredentials, CarrierSession, SessionOptions, SmppClient, SmppConnection, SmppError,
    SmppResult, SmppSession, SmppTransmitter, SmsMessage,
};
