use crate::models::{ChangeType, Commit};

/// `<7-char id> <message> (<n> changes)`.
pub fn oneline(commit: &Commit) -> String {
    let short_id: String = commit.id.chars().take(7).collect();
    let count = commit.changes.len();
    if count == 0 {
        return format!("{} {}", short_id, commit.message);
    }
    let noun = if count == 1 { "change" } else { "changes" };
    format!("{} {} ({} {})", short_id, commit.message, count, noun)
}

/// Multi-line rendering: header, message, and one line per change.
pub fn full(commit: &Commit) -> String {
    let mut out = String::new();

    out.push_str(&format!("commit {}\n", commit.id));
    if let Some(parent) = &commit.parent_id {
        out.push_str(&format!("parent {}\n", parent));
    }
    out.push_str(&format!("author {}\n", commit.author));
    out.push_str(&format!("date {}\n", commit.timestamp.to_rfc3339()));
    out.push_str(&format!("strategy {}\n", commit.strategy.as_str()));
    if !commit.tags.is_empty() {
        out.push_str(&format!("tags {}\n", commit.tags.join(", ")));
    }

    out.push('\n');
    out.push_str(&commit.message);
    out.push_str("\n\n");

    out.push_str("Changes:\n");
    for change in &commit.changes {
        let prefix = match change.change_type {
            ChangeType::Added => "+",
            ChangeType::Deleted => "-",
            ChangeType::Modified => "M",
        };
        out.push_str(&format!("  {} {}", prefix, change.path));
        if change.change_type == ChangeType::Modified {
            if let Some(delta) = change.size_delta {
                if delta >= 0 {
                    out.push_str(&format!(" (+{}B)", delta));
                } else {
                    out.push_str(&format!(" (-{}B)", -delta));
                }
            }
        }
        out.push('\n');
    }

    out
}
