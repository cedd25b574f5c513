//! Test utilities for KataForge services.
//!
//! Provides session fixtures that mint real signed cookies, so middleware
//! and handler tests need no live auth flow.
//! Import in `#[cfg(test)]` blocks and `tests/` only — never in production code.

pub mod auth;
