//! App-shell backend: auth gate, session lifecycle, and the send-message
//! orchestration that composes the webhook client with the source
//! extractor. Plain testable functions; a UI layer wraps them.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use opera_kb_client::{extract, ChatClient, GroundingChunk, Market, Product};

use crate::storage::Storage;

// ── Persisted state keys (localStorage analog) ──────────────────────────

/// Storage key for the authentication flag.
pub const AUTH_KEY: &str = "opera_kb_auth";

/// Storage key for the per-conversation session identifier.
pub const SESSION_KEY: &str = "opera_kb_session_id";

/// Access password for the client-side gate.
pub const ACCESS_PASSWORD: &str = "OperaKB2026";

/// Suggestions the UI rotates through on an empty conversation.
pub const EXAMPLE_QUESTIONS: [&str; 5] = [
    "What are the campaign rules for Opera Desktop in Brazil?",
    "How do I onboard a new market?",
    "What is the approval process for campaigns?",
    "Tell me about Opera GX features",
    "What are the differences between Desktop and Mobile campaigns?",
];

// ── Global runtime (the UI layer calls these functions synchronously) ───

fn global_runtime() -> &'static tokio::runtime::Runtime {
    static RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RT.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("failed to create tokio runtime")
    })
}

// ── Auth gate ───────────────────────────────────────────────────────────

/// Check the password and persist the auth flag. Returns whether the
/// password was accepted; a rejected password is not an Err.
pub fn do_login(storage: &Storage, password: &str) -> Result<bool, String> {
    if password != ACCESS_PASSWORD {
        return Ok(false);
    }
    storage.set(AUTH_KEY, "true")?;
    Ok(true)
}

/// Clear the persisted auth flag.
pub fn do_logout(storage: &Storage) -> Result<(), String> {
    storage.remove(AUTH_KEY)
}

pub fn is_authenticated(storage: &Storage) -> bool {
    storage.get(AUTH_KEY).as_deref() == Some("true")
}

// ── Conversation ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One conversation history entry returned to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// Source names extracted from the tail of the answer (model only).
    #[serde(default)]
    pub source_names: Vec<String>,
    /// Opaque citation payloads passed through from the webhook.
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One conversation: the webhook client, the session identifier sent with
/// every request, and the message history.
pub struct ChatSession {
    client: ChatClient,
    session_id: String,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    /// Resume the persisted conversation, or start a fresh one and persist
    /// its identifier.
    pub fn resume(client: ChatClient, storage: &Storage) -> Result<Self, String> {
        let session_id = match storage.get(SESSION_KEY) {
            Some(id) => id,
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                storage.set(SESSION_KEY, &id)?;
                id
            }
        };
        Ok(Self {
            client,
            session_id,
            history: Vec::new(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Send one question and append both sides to the history. Returns the
    /// model message. On any request failure the model message carries the
    /// fallback answer; the error detail is logged, never shown.
    pub fn send(&mut self, question: &str, market: Market, product: Product) -> ChatMessage {
        self.history.push(ChatMessage {
            role: Role::User,
            text: question.to_string(),
            source_names: Vec::new(),
            grounding_chunks: Vec::new(),
        });

        let response = global_runtime().block_on(self.client.send_chat_message(
            question,
            market,
            product,
            Some(&self.session_id),
        ));

        if !response.success {
            if let Some(detail) = &response.error {
                eprintln!("Failed to get response: {}", detail);
            }
        }

        let result = extract(&response.answer);
        let message = ChatMessage {
            role: Role::Model,
            text: result.clean_text,
            source_names: result.sources,
            grounding_chunks: response.sources.unwrap_or_default(),
        };
        self.history.push(message.clone());
        message
    }

    /// Start a new conversation: fresh session identifier (persisted) and
    /// an empty history. Prior extraction results are discarded with it.
    pub fn reset(&mut self, storage: &Storage) -> Result<(), String> {
        let id = uuid::Uuid::new_v4().to_string();
        storage.set(SESSION_KEY, &id)?;
        self.session_id = id;
        self.history.clear();
        Ok(())
    }
}
