use crate::error::Result;
use crate::models::{CommitChange, FileCategory};
use crate::scanner;
use crate::storage::ProjectStore;
use std::path::Path;
use tracing::debug;

fn category_for_path(path: &str) -> FileCategory {
    Path::new(path)
        .extension()
        .map(|e| FileCategory::from_extension(&e.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or(FileCategory::Unknown)
}

/// Diff a fresh scan against the persisted snapshot baseline.
///
/// Output order is deterministic for a fixed tree state: added and modified
/// entries sorted by path, then deleted entries sorted by path.
pub fn detect_changes(store: &ProjectStore) -> Result<Vec<CommitChange>> {
    let config = store.load_config()?;
    let snapshots = store.load_snapshots()?;
    let current = scanner::scan(
        store.root(),
        &config.ignore_patterns,
        &config.track_extensions,
    );

    let mut changes = Vec::new();

    for (path, file) in &current {
        match snapshots.get(path) {
            None => {
                changes.push(CommitChange::added(
                    path.clone(),
                    file.category,
                    file.hash.clone(),
                ));
            }
            Some(snapshot) if snapshot.hash != file.hash => {
                changes.push(CommitChange::modified(
                    path.clone(),
                    file.category,
                    snapshot.hash.clone(),
                    file.hash.clone(),
                    file.size as i64 - snapshot.size as i64,
                ));
            }
            Some(_) => {}
        }
    }

    for (path, snapshot) in &snapshots {
        if !current.contains_key(path) {
            changes.push(CommitChange::deleted(
                path.clone(),
                category_for_path(path),
                snapshot.hash.clone(),
                snapshot.size,
            ));
        }
    }

    debug!(
        "Detected {} changes against {} baselined files",
        changes.len(),
        snapshots.len()
    );
    Ok(changes)
}

/// Replace the snapshot baseline wholesale with the current tree state.
/// Returns the number of files baselined.
pub fn take_snapshot(store: &ProjectStore) -> Result<usize> {
    let config = store.load_config()?;
    let current = scanner::scan(
        store.root(),
        &config.ignore_patterns,
        &config.track_extensions,
    );

    let snapshots = current
        .iter()
        .map(|(path, file)| (path.clone(), file.to_snapshot()))
        .collect();
    store.save_snapshots(&snapshots)?;

    Ok(current.len())
}
