use crate::error::Result;
use crate::models::{ChangeType, FileCategory};
use crate::storage::ProjectStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate counters over the full (unfiltered) stored history.
#[derive(Debug, Clone, Serialize)]
pub struct CommitStats {
    pub total_commits: usize,
    pub total_changes: usize,
    pub files_added: usize,
    pub files_modified: usize,
    pub files_deleted: usize,
    pub by_category: BTreeMap<FileCategory, usize>,
    pub first_commit_at: Option<DateTime<Utc>>,
    pub last_commit_at: Option<DateTime<Utc>>,
    pub average_changes_per_commit: f64,
}

pub fn get_stats(store: &ProjectStore) -> Result<CommitStats> {
    let chain = store.load_chain()?;

    let mut total_changes = 0;
    let mut files_added = 0;
    let mut files_modified = 0;
    let mut files_deleted = 0;
    let mut by_category: BTreeMap<FileCategory, usize> = BTreeMap::new();

    for commit in &chain {
        total_changes += commit.changes.len();
        for change in &commit.changes {
            match change.change_type {
                ChangeType::Added => files_added += 1,
                ChangeType::Modified => files_modified += 1,
                ChangeType::Deleted => files_deleted += 1,
            }
            *by_category.entry(change.category).or_insert(0) += 1;
        }
    }

    let total_commits = chain.len();
    let average_changes_per_commit = if total_commits == 0 {
        0.0
    } else {
        total_changes as f64 / total_commits as f64
    };

    Ok(CommitStats {
        total_commits,
        total_changes,
        files_added,
        files_modified,
        files_deleted,
        by_category,
        // Chain is newest-first.
        first_commit_at: chain.last().map(|c| c.timestamp),
        last_commit_at: chain.first().map(|c| c.timestamp),
        average_changes_per_commit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{get_history, HistoryQuery};
    use crate::models::{AutoCommitConfig, Commit, CommitChange, CommitStrategy};
    use tempfile::TempDir;

    fn seed(store: &ProjectStore, id: &str, parent: Option<&str>, changes: Vec<CommitChange>) {
        let commit = Commit {
            id: id.to_string(),
            project_id: "proj".to_string(),
            timestamp: Utc::now(),
            message: format!("commit {}", id),
            author: "agent".to_string(),
            changes,
            strategy: CommitStrategy::Manual,
            parent_id: parent.map(|p| p.to_string()),
            tags: Vec::new(),
            metadata: Default::default(),
        };
        store.write_commit(&commit).unwrap();

        let mut state = store.load_state().unwrap();
        state.last_commit_id = Some(id.to_string());
        store.save_state(&state).unwrap();
    }

    #[test]
    fn test_empty_history_stats() {
        let temp = TempDir::new().unwrap();
        let store = ProjectStore::new(temp.path());
        store
            .init(&AutoCommitConfig::new(temp.path(), "agent"))
            .unwrap();

        let stats = get_stats(&store).unwrap();
        assert_eq!(stats.total_commits, 0);
        assert_eq!(stats.total_changes, 0);
        assert_eq!(stats.average_changes_per_commit, 0.0);
        assert!(stats.first_commit_at.is_none());
        assert!(stats.last_commit_at.is_none());
    }

    #[test]
    fn test_stats_accumulate_counts() {
        let temp = TempDir::new().unwrap();
        let store = ProjectStore::new(temp.path());
        store
            .init(&AutoCommitConfig::new(temp.path(), "agent"))
            .unwrap();

        seed(
            &store,
            "a1",
            None,
            vec![
                CommitChange::added("player.gd", FileCategory::Script, "h1".into()),
                CommitChange::added("level.tscn", FileCategory::Scene, "h2".into()),
            ],
        );
        seed(
            &store,
            "b2",
            Some("a1"),
            vec![
                CommitChange::modified("player.gd", FileCategory::Script, "h1".into(), "h3".into(), 4),
                CommitChange::deleted("level.tscn", FileCategory::Scene, "h2".into(), 10),
            ],
        );

        let stats = get_stats(&store).unwrap();
        assert_eq!(stats.total_commits, 2);
        assert_eq!(stats.total_changes, 4);
        assert_eq!(stats.files_added, 2);
        assert_eq!(stats.files_modified, 1);
        assert_eq!(stats.files_deleted, 1);
        assert_eq!(stats.by_category[&FileCategory::Script], 2);
        assert_eq!(stats.by_category[&FileCategory::Scene], 2);
        assert_eq!(stats.average_changes_per_commit, 2.0);
        assert!(stats.first_commit_at.unwrap() <= stats.last_commit_at.unwrap());
    }

    #[test]
    fn test_stats_match_history_sum() {
        let temp = TempDir::new().unwrap();
        let store = ProjectStore::new(temp.path());
        store
            .init(&AutoCommitConfig::new(temp.path(), "agent"))
            .unwrap();

        seed(
            &store,
            "a1",
            None,
            vec![CommitChange::added("a.gd", FileCategory::Script, "h".into())],
        );
        seed(
            &store,
            "b2",
            Some("a1"),
            vec![
                CommitChange::added("b.gd", FileCategory::Script, "h".into()),
                CommitChange::added("c.gd", FileCategory::Script, "h".into()),
            ],
        );

        let stats = get_stats(&store).unwrap();
        let page = get_history(&store, &HistoryQuery::default()).unwrap();
        let summed: usize = page.commits.iter().map(|c| c.changes.len()).sum();
        assert_eq!(stats.total_changes, summed);
    }
}
