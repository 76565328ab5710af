//! Unit tests for the message module.

mod log_tests;
