//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is
//! concrete types. Ports exist for:
//! - Database access (could swap SQLite -> Postgres)
//! - LLM calls (could swap Ollama -> Claude/OpenAI)
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

pub use error::{AuthError, LlmError, RepoError};
pub use external::{ChatMessage, FinishReason, LlmPort, LlmRequest, LlmResponse, MessageRole};
pub use repos::{CharacterRepo, NpcRepo, SessionRepo, UserRepo};
pub use testing::ClockPort;

#[cfg(test)]
pub use external::MockLlmPort;
#[cfg(test)]
pub use repos::{MockCharacterRepo, MockNpcRepo, MockSessionRepo, MockUserRepo};
