//! Shared helpers for quoter-bot integration tests.

pub mod common;
