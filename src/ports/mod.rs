//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - LLM completion service
//! - `SessionStore` - Per-session context persistence
//! - `FileStore` - Insurance document uploads

mod ai_provider;
mod file_store;
mod session_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use file_store::{FileStore, FileStoreError, StoredFile};
pub use session_store::{SessionStore, SessionStoreError};
