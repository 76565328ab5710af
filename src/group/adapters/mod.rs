//! Adapter implementations of the group registry ports.

pub mod memory;
pub mod postgres;
pub mod random;
