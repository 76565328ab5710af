//! Adapter implementations of the message log ports.

pub mod memory;
pub mod postgres;
