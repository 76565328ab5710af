//! Unit tests for the group module.
