//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - completion services (OpenAI, mock)
//! - `storage` - session stores (in-memory, YAML files)
//! - `uploads` - insurance document storage on the local filesystem
//! - `http` - axum REST API

pub mod ai;
pub mod http;
pub mod storage;
pub mod uploads;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use http::{app_router, SessionApiHandlers};
pub use storage::{FileSessionStore, InMemorySessionStore};
pub use uploads::LocalFileStore;
