use crate::error::{Error, Result};
use crate::models::{AutoCommitConfig, AutoCommitState, Commit, FileSnapshot};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory under the project root holding every persisted record.
pub const META_DIR: &str = ".autocommit";

/// On-disk layout per project, pretty-printed JSON throughout:
///
/// ```text
/// <project>/.autocommit/config.json       AutoCommitConfig
/// <project>/.autocommit/state.json        AutoCommitState (head pointer)
/// <project>/.autocommit/snapshots.json    map<path, FileSnapshot>
/// <project>/.autocommit/commits/<id>.json one Commit per file
/// ```
///
/// Every write is a full-file replacement, so a crash mid-write can corrupt
/// at most the one record being written. The store holds no lock; callers
/// serialize mutating operations per project.
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.root.join(META_DIR)
    }

    fn config_path(&self) -> PathBuf {
        self.meta_dir().join("config.json")
    }

    fn state_path(&self) -> PathBuf {
        self.meta_dir().join("state.json")
    }

    fn snapshots_path(&self) -> PathBuf {
        self.meta_dir().join("snapshots.json")
    }

    fn commits_dir(&self) -> PathBuf {
        self.meta_dir().join("commits")
    }

    fn commit_path(&self, id: &str) -> PathBuf {
        self.commits_dir().join(format!("{}.json", id))
    }

    pub fn is_initialized(&self) -> bool {
        self.state_path().is_file()
    }

    /// Create the record layout: config, empty state, empty snapshot map,
    /// empty commit directory.
    pub fn init(&self, config: &AutoCommitConfig) -> Result<()> {
        if self.is_initialized() {
            return Err(Error::AlreadyInitialized(self.root.display().to_string()));
        }

        fs::create_dir_all(self.commits_dir())?;
        self.save_config(config)?;
        self.save_state(&AutoCommitState::new())?;
        self.save_snapshots(&BTreeMap::new())?;

        info!("Initialized autocommit store at {:?}", self.meta_dir());
        Ok(())
    }

    fn write_record<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn read_record<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let raw = fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::NotInitialized(self.root.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;
        serde_json::from_str(&raw).map_err(|_| Error::CorruptRecord(path.display().to_string()))
    }

    pub fn load_config(&self) -> Result<AutoCommitConfig> {
        self.read_record(&self.config_path())
    }

    pub fn save_config(&self, config: &AutoCommitConfig) -> Result<()> {
        self.write_record(&self.config_path(), config)
    }

    pub fn load_state(&self) -> Result<AutoCommitState> {
        self.read_record(&self.state_path())
    }

    pub fn save_state(&self, state: &AutoCommitState) -> Result<()> {
        self.write_record(&self.state_path(), state)
    }

    pub fn load_snapshots(&self) -> Result<BTreeMap<String, FileSnapshot>> {
        self.read_record(&self.snapshots_path())
    }

    pub fn save_snapshots(&self, snapshots: &BTreeMap<String, FileSnapshot>) -> Result<()> {
        self.write_record(&self.snapshots_path(), snapshots)
    }

    pub fn write_commit(&self, commit: &Commit) -> Result<()> {
        self.write_record(&self.commit_path(&commit.id), commit)
    }

    /// Direct lookup by id. A missing record is `None`, not an error; a
    /// present but unparseable record is corruption.
    pub fn read_commit(&self, id: &str) -> Result<Option<Commit>> {
        let path = self.commit_path(id);
        match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|_| Error::CorruptRecord(path.display().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete_commit(&self, id: &str) -> Result<()> {
        match fs::remove_file(self.commit_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Reconstruct the chain newest-first by following `parent_id` from the
    /// head. A missing link halts the walk rather than erroring.
    pub fn load_chain(&self) -> Result<Vec<Commit>> {
        let state = self.load_state()?;
        let mut chain = Vec::new();
        let mut cursor = state.last_commit_id;

        while let Some(id) = cursor {
            match self.read_commit(&id)? {
                Some(commit) => {
                    cursor = commit.parent_id.clone();
                    chain.push(commit);
                }
                None => break,
            }
        }

        Ok(chain)
    }

    /// Irreversibly remove every persisted record. A no-op when nothing was
    /// ever initialized.
    pub fn destroy(&self) -> Result<()> {
        match fs::remove_dir_all(self.meta_dir()) {
            Ok(()) => {
                info!("Destroyed autocommit store at {:?}", self.meta_dir());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
