//! # Strata
//!
//! Library surface of the Strata binary, shared by `main.rs` and the
//! integration tests.

pub mod cli;
