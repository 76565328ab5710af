//! Group message log for ClassCollab.
//!
//! Messages are posted by members into one group and read back oldest
//! first. The read flag is shared by the whole group. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//!
//! # Example
//!
//! ```
//! use classcollab::group::domain::GroupId;
//! use classcollab::identity::domain::UserId;
//! use classcollab::message::domain::{Message, MessageContent};
//! use mockable::DefaultClock;
//!
//! let content = MessageContent::new("See you at the library").expect("valid content");
//! let mut message = Message::new(GroupId::new(), UserId::new(), content, &DefaultClock);
//! assert!(!message.is_read());
//!
//! message.mark_read();
//! assert!(message.is_read());
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
