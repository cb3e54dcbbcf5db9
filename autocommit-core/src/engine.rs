use crate::detect;
use crate::error::Result;
use crate::history::{self, HistoryPage, HistoryQuery};
use crate::models::{
    AutoCommitConfig, AutoCommitState, ChangeType, Commit, CommitChange, CommitStrategy,
    ConfigUpdate, FileCategory,
};
use crate::retention;
use crate::scanner::SHORT_HASH_LEN;
use crate::stats::{self, CommitStats};
use crate::storage::ProjectStore;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Per-project engine handle. Cheap to construct; every operation reads its
/// working set from disk, so handles may come and go freely between calls.
///
/// The engine holds no lock. Callers must serialize mutating operations
/// (commit, flush, prune, start/stop) per project; concurrent writers
/// produce undefined interleaving of `state.json`.
pub struct AutoCommit {
    store: ProjectStore,
}

impl AutoCommit {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            store: ProjectStore::new(project_path),
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn is_initialized(&self) -> bool {
        self.store.is_initialized()
    }

    /// Create the persisted layout for this project. Fails with
    /// `AlreadyInitialized` if a store already exists; `destroy` is the
    /// reset path.
    pub fn init(&self, mut config: AutoCommitConfig) -> Result<()> {
        config.project_path = self.store.root().to_path_buf();
        self.store.init(&config)
    }

    pub fn config(&self) -> Result<AutoCommitConfig> {
        self.store.load_config()
    }

    pub fn state(&self) -> Result<AutoCommitState> {
        self.store.load_state()
    }

    /// Apply a partial config patch and persist the result.
    pub fn update_config(&self, update: ConfigUpdate) -> Result<AutoCommitConfig> {
        let mut config = self.store.load_config()?;
        update.apply(&mut config);
        self.store.save_config(&config)?;
        Ok(config)
    }

    pub fn detect_changes(&self) -> Result<Vec<CommitChange>> {
        detect::detect_changes(&self.store)
    }

    /// Re-baseline the snapshot map to the current tree. Returns the number
    /// of files recorded.
    pub fn take_snapshot(&self) -> Result<usize> {
        detect::take_snapshot(&self.store)
    }

    /// Commit the currently detected change set. `None` means the tree is
    /// clean and nothing was written.
    pub fn create_commit(&self, message: Option<&str>) -> Result<Option<Commit>> {
        self.commit_changes(message, None)
    }

    /// Commit an explicit change set instead of running detection.
    pub fn create_commit_with(
        &self,
        message: Option<&str>,
        changes: Vec<CommitChange>,
    ) -> Result<Option<Commit>> {
        self.commit_changes(message, Some(changes))
    }

    fn commit_changes(
        &self,
        message: Option<&str>,
        changes: Option<Vec<CommitChange>>,
    ) -> Result<Option<Commit>> {
        let config = self.store.load_config()?;
        let mut state = self.store.load_state()?;

        let changes = match changes {
            Some(changes) => changes,
            None => detect::detect_changes(&self.store)?,
        };
        if changes.is_empty() {
            return Ok(None);
        }

        let timestamp = Utc::now();
        let message = match message {
            Some(m) => m.to_string(),
            None if config.auto_message_enabled() => auto_message(&changes),
            None => "Auto-commit".to_string(),
        };
        let id = commit_id(&timestamp, &message, &config.author);

        let commit = Commit {
            id,
            project_id: config.project_id.clone(),
            timestamp,
            message,
            author: config.author.clone(),
            changes,
            strategy: config.strategy,
            parent_id: state.last_commit_id.clone(),
            tags: Vec::new(),
            metadata: Default::default(),
        };

        self.store.write_commit(&commit)?;
        detect::take_snapshot(&self.store)?;

        state.last_commit_id = Some(commit.id.clone());
        state.last_commit_time = Some(timestamp);
        state.total_commits += 1;
        state.pending_changes.clear();
        state.updated_at = Utc::now();
        self.store.save_state(&state)?;

        if let Some(max_commits) = config.max_commits.filter(|m| *m > 0) {
            retention::prune_commits(&self.store, max_commits)?;
        }

        info!(
            "Created commit {} with {} changes",
            commit.id,
            commit.changes.len()
        );
        Ok(Some(commit))
    }

    /// Append changes (detected, or given) to the pending buffer without
    /// committing. Returns the buffer size afterwards.
    pub fn add_pending_changes(&self, changes: Option<Vec<CommitChange>>) -> Result<usize> {
        let mut state = self.store.load_state()?;
        let changes = match changes {
            Some(changes) => changes,
            None => detect::detect_changes(&self.store)?,
        };

        state.pending_changes.extend(changes);
        state.updated_at = Utc::now();
        self.store.save_state(&state)?;
        Ok(state.pending_changes.len())
    }

    /// Commit the accumulated pending buffer; `None` when the buffer is
    /// empty. The commit bookkeeping clears the buffer.
    pub fn flush_pending_changes(&self, message: Option<&str>) -> Result<Option<Commit>> {
        let state = self.store.load_state()?;
        if state.pending_changes.is_empty() {
            return Ok(None);
        }
        self.commit_changes(message, Some(state.pending_changes))
    }

    /// Evaluate the configured strategy without side effects.
    pub fn should_commit(&self) -> Result<bool> {
        let config = self.store.load_config()?;
        let state = self.store.load_state()?;

        Ok(match config.strategy {
            CommitStrategy::Immediate => true,
            CommitStrategy::Manual => false,
            CommitStrategy::Batched => {
                state.pending_changes.len() >= config.effective_batch_size()
            }
            CommitStrategy::Interval => match state.last_commit_time {
                None => true,
                Some(last) => {
                    Utc::now().signed_duration_since(last)
                        >= Duration::milliseconds(config.effective_interval_ms() as i64)
                }
            },
        })
    }

    /// Begin tracking: baseline the current tree and mark the state running.
    /// Returns `false` (without mutation) if already running.
    pub fn start_tracking(&self) -> Result<bool> {
        let mut state = self.store.load_state()?;
        if state.is_running {
            return Ok(false);
        }

        detect::take_snapshot(&self.store)?;
        state.is_running = true;
        state.updated_at = Utc::now();
        self.store.save_state(&state)?;

        info!("Started tracking {:?}", self.store.root());
        Ok(true)
    }

    /// Returns `false` (without mutation) if not running.
    pub fn stop_tracking(&self) -> Result<bool> {
        let mut state = self.store.load_state()?;
        if !state.is_running {
            return Ok(false);
        }

        state.is_running = false;
        state.updated_at = Utc::now();
        self.store.save_state(&state)?;

        info!("Stopped tracking {:?}", self.store.root());
        Ok(true)
    }

    pub fn prune_commits(&self, keep_count: usize) -> Result<usize> {
        retention::prune_commits(&self.store, keep_count)
    }

    pub fn get_history(&self, query: &HistoryQuery) -> Result<HistoryPage> {
        history::get_history(&self.store, query)
    }

    pub fn get_commit(&self, id: &str) -> Result<Option<Commit>> {
        history::get_commit(&self.store, id)
    }

    pub fn get_stats(&self) -> Result<CommitStats> {
        stats::get_stats(&self.store)
    }

    /// Irreversibly remove all persisted records for this project.
    pub fn destroy(&self) -> Result<()> {
        self.store.destroy()
    }
}

/// Commit id: short hash over timestamp, message, author, and a random salt.
/// Unique within one project's history; not globally unique.
fn commit_id(timestamp: &DateTime<Utc>, message: &str, author: &str) -> String {
    let salt = Uuid::new_v4();
    let mut hasher = Sha256::new();
    hasher.update(timestamp.to_rfc3339().as_bytes());
    hasher.update(message.as_bytes());
    hasher.update(author.as_bytes());
    hasher.update(salt.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..SHORT_HASH_LEN].to_string()
}

/// Summarize a change set: one clause per change group, joined with ", ".
/// A single file names the file; several files of one non-unknown category
/// name the category.
pub fn auto_message(changes: &[CommitChange]) -> String {
    if changes.is_empty() {
        return "No changes".to_string();
    }

    let mut clauses = Vec::new();
    for change_type in [ChangeType::Added, ChangeType::Modified, ChangeType::Deleted] {
        let group: Vec<&CommitChange> = changes
            .iter()
            .filter(|c| c.change_type == change_type)
            .collect();
        if group.is_empty() {
            continue;
        }

        let clause = if group.len() == 1 {
            format!("{} {}", change_type.verb(), group[0].path)
        } else {
            let category = group[0].category;
            if category != FileCategory::Unknown && group.iter().all(|c| c.category == category) {
                format!(
                    "{} {} {} files",
                    change_type.verb(),
                    group.len(),
                    category.as_str()
                )
            } else {
                format!("{} {} files", change_type.verb(), group.len())
            }
        };
        clauses.push(clause);
    }

    clauses.join(", ")
}
