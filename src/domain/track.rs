use std::collections::HashMap;
use std::path::PathBuf;

/// A source track after normalization, ready for concatenation
#[derive(Debug, Clone)]
pub struct Track {
    /// where the track came from
    pub source: PathBuf,
    /// normalized copy inside the run's temp workspace
    pub normalized: PathBuf,
    /// playback length of the normalized copy, in seconds
    pub duration_secs: f64,
    pub title: String,
}

/// Tag spellings checked when resolving a title, in precedence order
const TITLE_KEYS: &[&str] = &["title", "Title", "TITLE"];

/// Picks a track title from container tags.
///
/// The first non-empty value among the known tag spellings wins. Untagged
/// tracks get a numbered placeholder ("3. Unknown"); `position` is the
/// 1-based index of the track in playback order.
pub fn resolve_title(tags: &HashMap<String, String>, position: usize) -> String {
    for key in TITLE_KEYS {
        if let Some(value) = tags.get(*key) {
            let value = value.trim();
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }
    format!("{position}. Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_lowercase_key_wins_over_capitalized() {
        let t = tags(&[("title", "Low"), ("Title", "Cap"), ("TITLE", "Upper")]);
        assert_eq!(resolve_title(&t, 1), "Low");
    }

    #[test]
    fn test_capitalized_beats_uppercase() {
        let t = tags(&[("Title", "Cap"), ("TITLE", "Upper")]);
        assert_eq!(resolve_title(&t, 1), "Cap");
    }

    #[test]
    fn test_empty_value_falls_through() {
        let t = tags(&[("title", ""), ("TITLE", "Upper")]);
        assert_eq!(resolve_title(&t, 1), "Upper");
    }

    #[test]
    fn test_whitespace_value_counts_as_missing() {
        let t = tags(&[("Title", "   ")]);
        assert_eq!(resolve_title(&t, 4), "4. Unknown");
    }

    #[test]
    fn test_no_tags_gives_numbered_placeholder() {
        assert_eq!(resolve_title(&HashMap::new(), 1), "1. Unknown");
        assert_eq!(resolve_title(&HashMap::new(), 12), "12. Unknown");
    }

    #[test]
    fn test_title_is_trimmed() {
        let t = tags(&[("title", "  Intro \n")]);
        assert_eq!(resolve_title(&t, 1), "Intro");
    }

    #[test]
    fn test_unrelated_tags_are_ignored() {
        let t = tags(&[("artist", "Someone"), ("album", "Somewhere")]);
        assert_eq!(resolve_title(&t, 2), "2. Unknown");
    }
}
