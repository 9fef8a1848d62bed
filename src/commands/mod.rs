//! Command implementations
//!
//! One user-facing operation per file, each an `impl Repository` block.
//! The CLI in `main.rs` is thin glue over these entry points.

pub mod porcelain;
