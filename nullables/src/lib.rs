//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the node are abstracted behind traits in
//! `estate-types`. This crate provides test-friendly implementations that
//! return deterministic values and can be controlled programmatically.
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;

pub use clock::NullClock;
