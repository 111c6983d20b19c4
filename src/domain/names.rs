/// Canonical form used for every name comparison: trimmed, lower-cased,
/// internal whitespace collapsed to single spaces.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whitespace-separated words of an already normalized name
pub fn name_tokens(name: &str) -> impl Iterator<Item = &str> {
    name.split_whitespace()
}

/// Split a `;`-separated label cell, dropping empty entries
pub fn split_labels(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trimmed value or `None` when blank
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_folds_case_and_whitespace() {
        assert_eq!(normalize_name("  Jane   DOE "), "jane doe");
        assert_eq!(normalize_name("\tJane\nDoe"), "jane doe");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_split_labels() {
        assert_eq!(split_labels("Control; Mill ;;"), vec!["Control", "Mill"]);
        assert!(split_labels("  ").is_empty());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(" 42 "), Some("42".to_string()));
        assert_eq!(non_blank(""), None);
    }
}
