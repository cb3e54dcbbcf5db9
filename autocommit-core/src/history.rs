use crate::error::Result;
use crate::models::{Commit, FileCategory};
use crate::storage::ProjectStore;
use chrono::{DateTime, Utc};

/// Filter and pagination options for [`get_history`]. All fields are
/// optional; the default query returns the full chain newest-first.
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// Inclusive lower timestamp bound.
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper timestamp bound.
    pub until: Option<DateTime<Utc>>,
    pub author: Option<String>,
    /// Matches commits where any change touches a file of this category.
    pub category: Option<FileCategory>,
    /// Case-insensitive substring match over the message or any change path.
    pub search: Option<String>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct HistoryPage {
    /// Newest-first page of commits after filtering and pagination.
    pub commits: Vec<Commit>,
    /// Post-filter, pre-pagination size.
    pub total_count: usize,
}

fn matches(commit: &Commit, query: &HistoryQuery) -> bool {
    if let Some(since) = query.since {
        if commit.timestamp < since {
            return false;
        }
    }
    if let Some(until) = query.until {
        if commit.timestamp > until {
            return false;
        }
    }
    if let Some(author) = &query.author {
        if &commit.author != author {
            return false;
        }
    }
    if let Some(category) = query.category {
        if !commit.changes.iter().any(|c| c.category == category) {
            return false;
        }
    }
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        let in_message = commit.message.to_lowercase().contains(&needle);
        let in_paths = commit
            .changes
            .iter()
            .any(|c| c.path.to_lowercase().contains(&needle));
        if !in_message && !in_paths {
            return false;
        }
    }
    true
}

/// Reconstruct the chain from the head and apply filters, then paginate.
pub fn get_history(store: &ProjectStore, query: &HistoryQuery) -> Result<HistoryPage> {
    let chain = store.load_chain()?;

    let filtered: Vec<Commit> = chain.into_iter().filter(|c| matches(c, query)).collect();
    let total_count = filtered.len();

    let commits = filtered
        .into_iter()
        .skip(query.offset.unwrap_or(0))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();

    Ok(HistoryPage {
        commits,
        total_count,
    })
}

/// Direct lookup by commit id; `None` if absent.
pub fn get_commit(store: &ProjectStore, id: &str) -> Result<Option<Commit>> {
    store.read_commit(id)
}
