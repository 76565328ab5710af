//! Application services for the message log.

mod log;

pub use log::{MessageChanges, MessageLogService, MessageServiceError, MessageServiceResult};
