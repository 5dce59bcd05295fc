//! App-shell backend for the Opera knowledge-base chat client: persisted
//! auth/session state (the localStorage analog) and conversation history
//! around the webhook client. A UI layer calls these plain functions.

pub mod commands;
pub mod storage;

pub use commands::{
    do_login, do_logout, is_authenticated, ChatMessage, ChatSession, Role, ACCESS_PASSWORD,
    AUTH_KEY, EXAMPLE_QUESTIONS, SESSION_KEY,
};
pub use storage::Storage;
