// ABOUTME: HTTP-facing SMS gateway built on the SMPP client
// ABOUTME: Authentication, text encoding, the submission pipeline, caching, config and routes

pub mod auth;
pub mod cache;
pub mod config;
pub mod encoding;
pub mod error;
pub mod http;
pub mod registry;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{validate_api_key, ApiKey, AuthError, ClientRecord};
pub use cache::{CacheError, MemoryCache, MessageCache, RedisCache};
pub use config::{ConfigError, GatewayConfig};
pub use encoding::{EncodedText, TextEncoding};
pub use error::{LookupError, SubmissionError};
pub use http::router;
pub use registry::{ClientRegistry, FileRegistry, RegistryError};
pub use service::{
    CacheFailurePolicy, IdentifierPolicy, MessageRequest, MessageService, ServiceSettings,
    SubmissionReceipt,
};
