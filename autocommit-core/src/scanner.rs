use crate::models::{FileCategory, TrackedFile};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Length of the truncated hex content hash used for files and commit ids.
pub const SHORT_HASH_LEN: usize = 16;

/// Closed set of ignore-pattern forms, matched against individual path
/// segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnorePattern {
    /// Plain name: matches a segment exactly (`target`, `.git`).
    ExactSegment(String),
    /// `*.ext`: matches a segment ending with the given suffix.
    SuffixWildcard(String),
    /// `prefix*`: matches a segment starting with the given prefix.
    PrefixWildcard(String),
}

impl IgnorePattern {
    pub fn parse(pattern: &str) -> Self {
        if let Some(suffix) = pattern.strip_prefix('*') {
            IgnorePattern::SuffixWildcard(suffix.to_string())
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            IgnorePattern::PrefixWildcard(prefix.to_string())
        } else {
            IgnorePattern::ExactSegment(pattern.to_string())
        }
    }

    pub fn matches(&self, segment: &str) -> bool {
        match self {
            IgnorePattern::ExactSegment(name) => segment == name,
            IgnorePattern::SuffixWildcard(suffix) => segment.ends_with(suffix.as_str()),
            IgnorePattern::PrefixWildcard(prefix) => segment.starts_with(prefix.as_str()),
        }
    }
}

pub fn compile_patterns(patterns: &[String]) -> Vec<IgnorePattern> {
    patterns.iter().map(|p| IgnorePattern::parse(p)).collect()
}

fn is_ignored(segment: &str, patterns: &[IgnorePattern]) -> bool {
    patterns.iter().any(|p| p.matches(segment))
}

/// Short content hash: SHA-256, hex, truncated.
pub fn hash_bytes(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let digest = hex::encode(hasher.finalize());
    digest[..SHORT_HASH_LEN].to_string()
}

/// Walk the project root and return every tracked file keyed by its
/// `/`-separated relative path.
///
/// Ignored directories are pruned without descending. Unreadable entries are
/// skipped rather than surfaced as errors, and a missing root yields an
/// empty map.
pub fn scan(
    root: &Path,
    ignore_patterns: &[String],
    track_extensions: &[String],
) -> BTreeMap<String, TrackedFile> {
    let patterns = compile_patterns(ignore_patterns);
    let extensions: Vec<String> = track_extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .collect();

    let mut files = BTreeMap::new();

    if !root.is_dir() {
        return files;
    }

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        // Never filter the root itself; its name is not a tracked segment.
        entry.depth() == 0 || !is_ignored(&entry.file_name().to_string_lossy(), &patterns)
    });

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let rel_path = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let path: String = rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let ext = rel_path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if !extensions.is_empty() && !extensions.contains(&ext) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };
        let content = match std::fs::read(entry.path()) {
            Ok(c) => c,
            Err(_) => continue,
        };

        let last_modified: DateTime<Utc> = metadata
            .modified()
            .map(DateTime::from)
            .unwrap_or_else(|_| Utc::now());

        files.insert(
            path.clone(),
            TrackedFile {
                path,
                hash: hash_bytes(&content),
                size: metadata.len(),
                category: FileCategory::from_extension(&ext),
                last_modified,
            },
        );
    }

    debug!("Scanned {} tracked files under {:?}", files.len(), root);
    files
}
