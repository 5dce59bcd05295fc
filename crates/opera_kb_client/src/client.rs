//! Webhook request client: POST the question, retry on empty bodies, fold
//! every failure into the returned `ChatResponse`.

use std::time::Duration;

use crate::types::{ChatRequest, ChatResponse, Market, Product};

/// Default webhook base URL; override with `OPERA_KB_API_BASE`.
pub const DEFAULT_API_BASE: &str = "https://n8n.lomeai.com/webhook";

/// Chat endpoint path under the base URL.
pub const CHAT_ENDPOINT: &str = "opera-kb-chat";

/// Retries after the first attempt when the webhook returns an empty body.
/// Non-2xx statuses are never retried.
pub const MAX_RETRIES: u32 = 2;

/// Pause between empty-body attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Answer shown to the user whenever the request fails. The real error goes
/// into `ChatResponse::error` and stderr, not the conversation.
pub const FALLBACK_ANSWER: &str = "Failed to get response. Please try again.";

/// Request failure; always folded into a `ChatResponse`, never surfaced raw.
#[derive(Debug)]
pub enum ClientError {
    /// Transport-level failure (connect, DNS, bad URL).
    Http(String),
    /// Non-2xx status from the webhook.
    Status(String),
    /// Every attempt came back with an empty body.
    EmptyResponse,
    /// 2xx body that was not valid response JSON.
    Json(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(s) => write!(f, "{}", s),
            ClientError::Status(s) => write!(f, "Chat request failed: {}", s),
            ClientError::EmptyResponse => write!(f, "Empty response after retries"),
            ClientError::Json(s) => write!(f, "Invalid response body: {}", s),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Json(e.to_string())
    }
}

/// Resolve the webhook base URL from `OPERA_KB_API_BASE` or the default.
pub fn api_base() -> String {
    std::env::var("OPERA_KB_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
}

/// Webhook chat client. Requests are independent; one instance serves a
/// whole conversation.
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    retry_delay: Duration,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            retry_delay: RETRY_DELAY,
        }
    }

    /// Client pointed at `OPERA_KB_API_BASE` or the default webhook.
    pub fn from_env() -> Self {
        Self::new(api_base())
    }

    /// Shorten the pause between empty-body attempts (tests).
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one question. Never returns an error: transport failures, bad
    /// statuses, unparseable bodies, and exhausted retries all come back as
    /// `success: false` with the fallback answer and the detail in `error`.
    pub async fn send_chat_message(
        &self,
        question: &str,
        market: Market,
        product: Product,
        session_id: Option<&str>,
    ) -> ChatResponse {
        match self.try_send(question, market, product, session_id).await {
            Ok(response) => response,
            Err(e) => {
                eprintln!("Chat error: {}", e);
                ChatResponse {
                    success: false,
                    answer: FALLBACK_ANSWER.to_string(),
                    sources: None,
                    token_usage: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn try_send(
        &self,
        question: &str,
        market: Market,
        product: Product,
        session_id: Option<&str>,
    ) -> Result<ChatResponse, ClientError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), CHAT_ENDPOINT);
        let body = ChatRequest::new(question, market, product, session_id);

        let mut attempt: u32 = 0;
        loop {
            let response = self.http.post(&url).json(&body).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ClientError::Status(status.to_string()));
            }

            // The payload is trusted to already match ChatResponse; return
            // it verbatim.
            let text = response.text().await?;
            if !text.is_empty() {
                return serde_json::from_str(&text).map_err(ClientError::from);
            }

            if attempt == MAX_RETRIES {
                return Err(ClientError::EmptyResponse);
            }
            attempt += 1;
            eprintln!(
                "Warning: empty response from webhook, retrying ({}/{})",
                attempt, MAX_RETRIES
            );
            tokio::time::sleep(self.retry_delay).await;
        }
    }
}
