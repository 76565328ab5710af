//! Domain model for group messages.

mod error;
mod ids;
mod message;

pub use error::MessageDomainError;
pub use ids::{MessageContent, MessageId};
pub use message::{Message, PersistedMessageData, SentMessage};
