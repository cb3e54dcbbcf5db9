use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_INTERVAL_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
}

impl ChangeType {
    pub fn as_str(&self) -> &str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Modified => "modified",
            ChangeType::Deleted => "deleted",
        }
    }

    /// Verb used when summarizing a change group in a commit message.
    pub fn verb(&self) -> &str {
        match self {
            ChangeType::Added => "Add",
            ChangeType::Modified => "Update",
            ChangeType::Deleted => "Remove",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "added" => Some(ChangeType::Added),
            "modified" => Some(ChangeType::Modified),
            "deleted" => Some(ChangeType::Deleted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Script,
    Scene,
    Resource,
    Shader,
    Asset,
    Config,
    Doc,
    Unknown,
}

impl FileCategory {
    /// Map a lowercase file extension (without dot) to its category.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "gd" | "cs" | "rs" | "py" | "js" | "ts" | "sh" => FileCategory::Script,
            "tscn" | "scn" => FileCategory::Scene,
            "tres" | "res" => FileCategory::Resource,
            "gdshader" | "glsl" | "wgsl" => FileCategory::Shader,
            "png" | "jpg" | "jpeg" | "svg" | "webp" | "wav" | "ogg" | "mp3" | "ttf" | "otf"
            | "glb" | "gltf" => FileCategory::Asset,
            "json" | "toml" | "yaml" | "yml" | "cfg" | "ini" | "import" | "godot" => {
                FileCategory::Config
            }
            "md" | "txt" | "rst" => FileCategory::Doc,
            _ => FileCategory::Unknown,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FileCategory::Script => "script",
            FileCategory::Scene => "scene",
            FileCategory::Resource => "resource",
            FileCategory::Shader => "shader",
            FileCategory::Asset => "asset",
            FileCategory::Config => "config",
            FileCategory::Doc => "doc",
            FileCategory::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitStrategy {
    Immediate,
    Batched,
    Interval,
    Manual,
}

impl CommitStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            CommitStrategy::Immediate => "immediate",
            CommitStrategy::Batched => "batched",
            CommitStrategy::Interval => "interval",
            CommitStrategy::Manual => "manual",
        }
    }
}

/// One file as seen by a single scan pass. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    pub path: String,
    pub hash: String,
    pub size: u64,
    pub category: FileCategory,
    pub last_modified: DateTime<Utc>,
}

impl TrackedFile {
    pub fn to_snapshot(&self) -> FileSnapshot {
        FileSnapshot {
            path: self.path.clone(),
            hash: self.hash.clone(),
            size: self.size,
            last_modified: self.last_modified,
        }
    }
}

/// Persisted per-path baseline used as the diff reference point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSnapshot {
    pub path: String,
    pub hash: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitChange {
    pub path: String,
    pub change_type: ChangeType,
    pub category: FileCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_delta: Option<i64>,
}

impl CommitChange {
    pub fn added(path: impl Into<String>, category: FileCategory, new_hash: String) -> Self {
        Self {
            path: path.into(),
            change_type: ChangeType::Added,
            category,
            old_hash: None,
            new_hash: Some(new_hash),
            size_delta: None,
        }
    }

    pub fn modified(
        path: impl Into<String>,
        category: FileCategory,
        old_hash: String,
        new_hash: String,
        size_delta: i64,
    ) -> Self {
        Self {
            path: path.into(),
            change_type: ChangeType::Modified,
            category,
            old_hash: Some(old_hash),
            new_hash: Some(new_hash),
            size_delta: Some(size_delta),
        }
    }

    pub fn deleted(
        path: impl Into<String>,
        category: FileCategory,
        old_hash: String,
        old_size: u64,
    ) -> Self {
        Self {
            path: path.into(),
            change_type: ChangeType::Deleted,
            category,
            old_hash: Some(old_hash),
            new_hash: None,
            size_delta: Some(-(old_size as i64)),
        }
    }
}

/// Immutable commit record. `parent_id` forms a singly linked chain that
/// terminates at `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub project_id: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub author: String,
    pub changes: Vec<CommitChange>,
    pub strategy: CommitStrategy,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Commit {
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoCommitConfig {
    pub project_id: String,
    pub project_path: PathBuf,
    pub author: String,
    pub strategy: CommitStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default)]
    pub track_extensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_message: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_commits: Option<usize>,
}

impl AutoCommitConfig {
    pub fn new(project_path: impl Into<PathBuf>, author: impl Into<String>) -> Self {
        Self {
            project_id: uuid::Uuid::new_v4().to_string(),
            project_path: project_path.into(),
            author: author.into(),
            strategy: CommitStrategy::Immediate,
            interval_ms: None,
            batch_size: None,
            ignore_patterns: default_ignore_patterns(),
            track_extensions: Vec::new(),
            auto_message: None,
            max_commits: None,
        }
    }

    pub fn with_strategy(mut self, strategy: CommitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = Some(interval_ms);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn with_track_extensions(mut self, extensions: Vec<String>) -> Self {
        self.track_extensions = extensions;
        self
    }

    pub fn with_auto_message(mut self, auto_message: bool) -> Self {
        self.auto_message = Some(auto_message);
        self
    }

    pub fn with_max_commits(mut self, max_commits: usize) -> Self {
        self.max_commits = Some(max_commits);
        self
    }

    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    pub fn effective_interval_ms(&self) -> u64 {
        self.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS)
    }

    pub fn auto_message_enabled(&self) -> bool {
        self.auto_message.unwrap_or(true)
    }
}

pub fn default_ignore_patterns() -> Vec<String> {
    vec![
        ".git".to_string(),
        ".autocommit".to_string(),
        ".godot".to_string(),
        ".import".to_string(),
        "target".to_string(),
        "node_modules".to_string(),
    ]
}

/// Partial update applied to a stored config. Identity fields
/// (`project_id`, `project_path`) are fixed at init.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub author: Option<String>,
    pub strategy: Option<CommitStrategy>,
    pub interval_ms: Option<u64>,
    pub batch_size: Option<usize>,
    pub ignore_patterns: Option<Vec<String>>,
    pub track_extensions: Option<Vec<String>>,
    pub auto_message: Option<bool>,
    pub max_commits: Option<usize>,
}

impl ConfigUpdate {
    pub fn apply(&self, config: &mut AutoCommitConfig) {
        if let Some(author) = &self.author {
            config.author = author.clone();
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.interval_ms = Some(interval_ms);
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = Some(batch_size);
        }
        if let Some(patterns) = &self.ignore_patterns {
            config.ignore_patterns = patterns.clone();
        }
        if let Some(extensions) = &self.track_extensions {
            config.track_extensions = extensions.clone();
        }
        if let Some(auto_message) = self.auto_message {
            config.auto_message = Some(auto_message);
        }
        if let Some(max_commits) = self.max_commits {
            config.max_commits = Some(max_commits);
        }
    }
}

/// Mutable head record, one per project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoCommitState {
    pub last_commit_id: Option<String>,
    pub last_commit_time: Option<DateTime<Utc>>,
    pub total_commits: u64,
    pub pending_changes: Vec<CommitChange>,
    pub is_running: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AutoCommitState {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            last_commit_id: None,
            last_commit_time: None,
            total_commits: 0,
            pending_changes: Vec::new(),
            is_running: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for AutoCommitState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_type_round_trip() {
        for ct in [ChangeType::Added, ChangeType::Modified, ChangeType::Deleted] {
            assert_eq!(ChangeType::parse(ct.as_str()), Some(ct));
        }
        assert_eq!(ChangeType::parse("renamed"), None);
    }

    #[test]
    fn test_change_type_verbs() {
        assert_eq!(ChangeType::Added.verb(), "Add");
        assert_eq!(ChangeType::Modified.verb(), "Update");
        assert_eq!(ChangeType::Deleted.verb(), "Remove");
    }

    #[test]
    fn test_category_table() {
        assert_eq!(FileCategory::from_extension("gd"), FileCategory::Script);
        assert_eq!(FileCategory::from_extension("tscn"), FileCategory::Scene);
        assert_eq!(FileCategory::from_extension("tres"), FileCategory::Resource);
        assert_eq!(FileCategory::from_extension("png"), FileCategory::Asset);
        assert_eq!(FileCategory::from_extension("toml"), FileCategory::Config);
        assert_eq!(FileCategory::from_extension("md"), FileCategory::Doc);
        assert_eq!(FileCategory::from_extension("xyz"), FileCategory::Unknown);
    }

    #[test]
    fn test_config_defaults() {
        let config = AutoCommitConfig::new("/test/project", "agent");
        assert_eq!(config.strategy, CommitStrategy::Immediate);
        assert_eq!(config.effective_batch_size(), DEFAULT_BATCH_SIZE);
        assert_eq!(config.effective_interval_ms(), DEFAULT_INTERVAL_MS);
        assert!(config.auto_message_enabled());
        assert!(config.ignore_patterns.contains(&".autocommit".to_string()));
        assert!(!config.project_id.is_empty());
    }

    #[test]
    fn test_config_builders() {
        let config = AutoCommitConfig::new("/test/project", "agent")
            .with_strategy(CommitStrategy::Batched)
            .with_batch_size(3)
            .with_max_commits(10)
            .with_track_extensions(vec!["gd".to_string()]);

        assert_eq!(config.strategy, CommitStrategy::Batched);
        assert_eq!(config.effective_batch_size(), 3);
        assert_eq!(config.max_commits, Some(10));
        assert_eq!(config.track_extensions, vec!["gd".to_string()]);
    }

    #[test]
    fn test_config_update() {
        let mut config = AutoCommitConfig::new("/test/project", "agent");
        let id = config.project_id.clone();

        let update = ConfigUpdate {
            strategy: Some(CommitStrategy::Interval),
            interval_ms: Some(1000),
            ..Default::default()
        };
        update.apply(&mut config);

        assert_eq!(config.strategy, CommitStrategy::Interval);
        assert_eq!(config.effective_interval_ms(), 1000);
        assert_eq!(config.project_id, id);
        assert_eq!(config.author, "agent");
    }

    #[test]
    fn test_deleted_change_size_delta() {
        let change = CommitChange::deleted("old.gd", FileCategory::Script, "abc".to_string(), 42);
        assert_eq!(change.size_delta, Some(-42));
        assert!(change.new_hash.is_none());
    }

    #[test]
    fn test_state_new() {
        let state = AutoCommitState::new();
        assert!(state.last_commit_id.is_none());
        assert_eq!(state.total_commits, 0);
        assert!(state.pending_changes.is_empty());
        assert!(!state.is_running);
    }
}
