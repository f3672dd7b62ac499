// ABOUTME: SMPP client module providing trait-based interfaces for the transmitter side of a carrier link
// ABOUTME: Exports the traits, the default client, the shared session and its keep-alive

//! SMPP Client Module
//!
//! * **Native async traits** - `async fn` in traits, no async_trait dependency
//! * **Layered design** - connection, session and submit operations are separate traits
//! * **Shared session** - `SmppSession` lets many tasks submit over one bound link
//! * **Keep-alive** - periodic enquire_link with a failure budget
//!
//! ```rust,no_run
//! use smsgate::client::{BindCredentials, CarrierSession, SessionOptions, SmppSession, SmsMessage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = BindCredentials::transmitter("system_id", "password");
//! let session = SmppSession::establish("localhost:2775", &credentials, SessionOptions::default()).await?;
//!
//! let message = SmsMessage::new("+447700900123", "SHOP", "Hello!".as_bytes().to_vec());
//! let receipt = session.submit(&message).await?;
//! println!("accepted as {}", receipt.message_id);
//!
//! session.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod default;
pub mod error;
pub mod keepalive;
pub mod session;
pub mod traits;
pub mod types;

pub use default::DefaultClient;
pub use error::{SmppError, SmppResult};
pub use keepalive::{KeepAliveConfig, KeepAliveManager};
pub use session::{SessionOptions, SmppSession};
pub use traits::{CarrierSession, SmppClient, SmppConnection, SmppTransmitter};
pub use types::{BindCredentials, SmsMessage, SmsOptions, SubmitReceipt};
