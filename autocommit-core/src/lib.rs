//! # autocommit-core
//!
//! Core library for autocommit - change tracking and commit history for
//! generated artifacts.
//!
//! This crate snapshots tracked files under a project root, detects
//! additions, modifications, and deletions by content hashing, and records
//! them as an immutable singly linked chain of commits with configurable
//! cadence, retention pruning, and queryable statistics.

pub mod detect;
pub mod engine;
pub mod error;
pub mod format;
pub mod history;
pub mod models;
pub mod retention;
pub mod scanner;
pub mod stats;
pub mod storage;

pub use engine::AutoCommit;
pub use error::{Error, Result};
pub use history::{HistoryPage, HistoryQuery};
pub use models::{
    AutoCommitConfig, AutoCommitState, ChangeType, Commit, CommitChange, CommitStrategy,
    ConfigUpdate, FileCategory, FileSnapshot, TrackedFile,
};
pub use stats::CommitStats;
pub use storage::ProjectStore;
