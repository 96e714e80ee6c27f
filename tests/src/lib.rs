//! # textrelay Test Suite
//!
//! Unified test crate for flows that span the workspace crates:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── queue_flow.rs      # dispatcher + listener over in-memory channels
//!     └── endpoints_flow.rs  # multi-endpoint client against live mock endpoints
//! ```
//!
//! Run with `cargo test -p relay-tests`.
