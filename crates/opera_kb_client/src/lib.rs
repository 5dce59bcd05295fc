//! Opera knowledge-base chat client library (webhook request client, source
//! extraction, config). Used by the app shell and the `opera-kb` CLI.

pub mod client;
pub mod config;
pub mod extract;
pub mod types;

pub use client::{
    api_base, ChatClient, ClientError, CHAT_ENDPOINT, DEFAULT_API_BASE, FALLBACK_ANSWER,
    MAX_RETRIES, RETRY_DELAY,
};
pub use config::{default_config_path, ApiSection, ChatSection, Config, ConfigError};
pub use extract::{extract, ExtractionResult};
pub use types::{ChatRequest, ChatResponse, GroundingChunk, Market, Product, RetrievedContext, TokenUsage};
