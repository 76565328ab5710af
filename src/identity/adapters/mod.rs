//! Adapter implementations of the identity ports.

pub mod argon2;
pub mod jwt;
pub mod memory;
pub mod postgres;
