//! Short package labels derived from package names
//!
//! Labels are a best-effort heuristic and not guaranteed to be unique. The
//! store rejects collisions when a package is saved.
//!
//! # Examples
//!
//! ```
//! use proji::derive_label;
//!
//! assert_eq!(derive_label("my-cool-app"), "mca");
//! assert_eq!(derive_label("MyCoolApp"), "mca");
//! ```

use regex::Regex;
use std::sync::OnceLock;

/// Separators tried in order when splitting a name. `%20` covers escaped paths.
const LABEL_SEPARATORS: [&str; 5] = ["-", "_", ".", " ", "%20"];

/// Maximum number of name parts that contribute a character to the label
const MAX_LABEL_PARTS: usize = 5;

fn camel_case_runs() -> &'static Regex {
    static RUNS: OnceLock<Regex> = OnceLock::new();
    RUNS.get_or_init(|| Regex::new(r"[A-Z][^A-Z]*").expect("static pattern is valid"))
}

/// Derive a short, lowercase label from a package name
///
/// Tries, in order: the name itself when shorter than two characters, the
/// initials of separator-delimited parts, the initials of camel-case runs,
/// and finally the first, middle and last characters of the name.
pub fn derive_label(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() < 2 {
        return name.to_lowercase();
    }

    if let Some(label) = label_from_separators(name) {
        return label;
    }

    if let Some(label) = label_from_camel_case(&chars) {
        return label;
    }

    label_from_positions(&chars)
}

fn label_from_separators(name: &str) -> Option<String> {
    let parts: Vec<&str> = LABEL_SEPARATORS
        .iter()
        .map(|separator| name.split(separator).collect::<Vec<_>>())
        .find(|parts| parts.len() > 1)?;

    initials(parts.into_iter())
}

fn label_from_camel_case(chars: &[char]) -> Option<String> {
    let mut capitalized: String = chars[0].to_uppercase().collect();
    capitalized.extend(&chars[1..]);

    let runs: Vec<&str> = camel_case_runs()
        .find_iter(&capitalized)
        .map(|run| run.as_str())
        .collect();
    if runs.len() < 2 {
        return None;
    }

    initials(runs.into_iter())
}

fn initials<'a>(parts: impl Iterator<Item = &'a str>) -> Option<String> {
    let label: String = parts
        .take(MAX_LABEL_PARTS)
        .filter_map(|part| part.chars().next())
        .collect::<String>()
        .to_lowercase();

    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

fn label_from_positions(chars: &[char]) -> String {
    let mut positions = vec![0, chars.len() / 2, chars.len() - 1];
    positions.dedup();

    positions
        .into_iter()
        .map(|i| chars[i])
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names() {
        assert_eq!(derive_label("x"), "x");
        assert_eq!(derive_label("X"), "x");
        assert_eq!(derive_label("ab"), "ab");
        assert_eq!(derive_label(""), "");
    }

    #[test]
    fn test_separators() {
        assert_eq!(derive_label("my-cool-app"), "mca");
        assert_eq!(derive_label("my_cool_app"), "mca");
        assert_eq!(derive_label("my.cool.app"), "mca");
        assert_eq!(derive_label("My Cool App"), "mca");
        assert_eq!(derive_label("my%20cool%20app"), "mca");
    }

    #[test]
    fn test_first_matching_separator_wins() {
        // '-' is tried before '_'
        assert_eq!(derive_label("a_b-c_d"), "ac");
    }

    #[test]
    fn test_at_most_five_parts() {
        assert_eq!(derive_label("a-b-c-d-e-f-g"), "abcde");
        assert_eq!(derive_label("OneTwoThreeFourFiveSix"), "ottff");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(derive_label("MyCoolApp"), "mca");
        assert_eq!(derive_label("myCoolApp"), "mca");
    }

    #[test]
    fn test_first_middle_last() {
        assert_eq!(derive_label("python"), "phn");
        assert_eq!(derive_label("abc"), "abc");
        assert_eq!(derive_label("rust"), "rst");
        assert_eq!(derive_label("RUST"), "rust");
    }

    #[test]
    fn test_empty_parts_are_ignored() {
        assert_eq!(derive_label("-go"), "g");
        assert_eq!(derive_label("--"), "--");
    }

    #[test]
    fn test_deterministic() {
        let first = derive_label("proji-official-collection");
        assert_eq!(first, "poc");
        assert_eq!(derive_label("proji-official-collection"), first);
    }
}
