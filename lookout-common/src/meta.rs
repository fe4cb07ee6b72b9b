//! Keys that backends attach to a whole response rather than to a result row.

/// Top-level keys treated as response metadata.
///
/// They are dropped from the direct entries of a top-level result object
/// only. Nested records keep fields with the same names.
pub const HIDDEN_META_KEYS: [&str; 6] = [
    "NumOfResults",
    "NumOfDatabase",
    "NumOfDatabases",
    "price",
    "search time",
    "search_time",
];

/// Whether `key` names a top-level metadata entry.
pub fn is_hidden(key: &str) -> bool {
    HIDDEN_META_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_names_only() {
        assert!(is_hidden("NumOfResults"));
        assert!(is_hidden("NumOfDatabases"));
        assert!(is_hidden("search_time"));
        assert!(!is_hidden("numofresults"));
        assert!(!is_hidden("Price"));
        assert!(!is_hidden("Data"));
    }
}
