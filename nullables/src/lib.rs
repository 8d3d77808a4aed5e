//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator the governance core talks to is abstracted behind a
//! trait in `civic-store`. This crate provides implementations that:
//! - Keep all state in memory, in a byte-ordered map laid out like the real store
//! - Encode records with bincode, so encoding bugs surface in tests
//! - Can be inspected programmatically
//!
//! Usage: hand a `NullStore` and a `NullEventSink` to the engine in tests.

pub mod events;
pub mod store;

pub use events::NullEventSink;
pub use store::NullStore;
