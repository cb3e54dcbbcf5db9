//! # autocommit
//!
//! Umbrella crate re-exporting the autocommit engine.

pub use autocommit_core::*;
