//! In-memory adapter for the message log.

mod message;

pub use message::InMemoryMessageRepository;
