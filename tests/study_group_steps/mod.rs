//! Step definitions for study group scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
