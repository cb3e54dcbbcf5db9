use crate::error::Result;
use crate::storage::ProjectStore;
use tracing::info;

/// Truncate the chain to the newest `keep_count` commits and re-parent the
/// oldest retained commit to `None` so the chain stays well-formed.
///
/// Returns the number of commits deleted. `keep_count == 0` is a no-op: the
/// head pointer must always reference an existing commit once one exists.
pub fn prune_commits(store: &ProjectStore, keep_count: usize) -> Result<usize> {
    if keep_count == 0 {
        return Ok(0);
    }

    let mut chain = store.load_chain()?;
    if chain.len() <= keep_count {
        return Ok(0);
    }

    let removed = chain.split_off(keep_count);
    for commit in &removed {
        store.delete_commit(&commit.id)?;
    }

    // The chain is newest-first, so the last retained entry is the new
    // oldest commit.
    if let Some(oldest) = chain.last() {
        if oldest.parent_id.is_some() {
            let mut reparented = oldest.clone();
            reparented.parent_id = None;
            store.write_commit(&reparented)?;
        }
    }

    info!(
        "Pruned {} commits, retaining newest {}",
        removed.len(),
        chain.len()
    );
    Ok(removed.len())
}
