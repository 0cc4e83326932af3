//! Platform-neutral repository tree entries and their conversion to templates

use crate::package::Template;
use regex::Regex;

/// Kind of a node in a remote repository tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A file
    Blob,
    /// A directory
    Tree,
    /// Anything else the platform reports (e.g. submodule commits)
    Other(String),
}

impl EntryKind {
    /// Map a platform type string ("blob", "tree", ...) to a kind
    pub fn from_type(kind: &str) -> Self {
        match kind {
            "blob" => EntryKind::Blob,
            "tree" => EntryKind::Tree,
            other => EntryKind::Other(other.to_string()),
        }
    }
}

/// One entry of a remote repository tree, as listed by an importer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path relative to the repository root, `/` separated
    pub path: String,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn new(path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Convert tree entries into templates, keeping only entries matched by at least one filter
///
/// An empty filter list keeps every entry. The resulting templates only carry a
/// destination; their source path is filled in later by dependency resolution.
pub fn filter_and_convert(entries: &[TreeEntry], filters: &[Regex]) -> Vec<Template> {
    entries
        .iter()
        .filter(|entry| filters.is_empty() || filters.iter().any(|f| f.is_match(&entry.path)))
        .map(|entry| Template {
            is_file: entry.kind == EntryKind::Blob,
            path: String::new(),
            destination: entry.path.clone(),
            description: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<TreeEntry> {
        vec![
            TreeEntry::new("README.md", EntryKind::Blob),
            TreeEntry::new("configs", EntryKind::Tree),
            TreeEntry::new("configs/python.toml", EntryKind::Blob),
            TreeEntry::new("templates/python/main.py", EntryKind::Blob),
            TreeEntry::new("vendor/lib", EntryKind::Other("commit".to_string())),
        ]
    }

    #[test]
    fn test_no_filters_keeps_everything_in_order() {
        let entries = sample_entries();
        let templates = filter_and_convert(&entries, &[]);

        assert_eq!(templates.len(), entries.len());
        for (template, entry) in templates.iter().zip(&entries) {
            assert_eq!(template.destination, entry.path);
            assert!(template.path.is_empty());
        }
    }

    #[test]
    fn test_kind_mapping() {
        let templates = filter_and_convert(&sample_entries(), &[]);
        let flags: Vec<bool> = templates.iter().map(|t| t.is_file).collect();
        assert_eq!(flags, vec![true, false, true, true, false]);
    }

    #[test]
    fn test_filters_keep_only_matches() {
        let filters = vec![Regex::new("^configs/").unwrap()];
        let templates = filter_and_convert(&sample_entries(), &filters);

        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].destination, "configs/python.toml");
        assert!(templates[0].is_file);
    }

    #[test]
    fn test_any_filter_matching_is_enough() {
        let filters = vec![
            Regex::new("nothing-matches-this").unwrap(),
            Regex::new(r"\.md$").unwrap(),
            Regex::new("templates/").unwrap(),
        ];
        let destinations: Vec<String> = filter_and_convert(&sample_entries(), &filters)
            .into_iter()
            .map(|t| t.destination)
            .collect();

        assert_eq!(destinations, vec!["README.md", "templates/python/main.py"]);
    }

    #[test]
    fn test_unanchored_filter_matches_anywhere() {
        let filters = vec![Regex::new("python").unwrap()];
        assert_eq!(filter_and_convert(&sample_entries(), &filters).len(), 2);
    }

    #[test]
    fn test_entry_kind_from_type() {
        assert_eq!(EntryKind::from_type("blob"), EntryKind::Blob);
        assert_eq!(EntryKind::from_type("tree"), EntryKind::Tree);
        assert_eq!(
            EntryKind::from_type("commit"),
            EntryKind::Other("commit".to_string())
        );
    }
}
