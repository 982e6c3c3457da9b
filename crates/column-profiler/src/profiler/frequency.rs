//! Top-k frequency ranking.

use indexmap::IndexMap;

use crate::types::FrequencyTable;

/// Count occurrences and keep the `k` most frequent values.
///
/// Values are ordered by count, descending. Values with equal counts keep
/// the order in which they were first encountered, so the same input always
/// yields the same table.
pub fn top_k<I, S>(values: I, k: usize) -> FrequencyTable
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for value in values {
        let value = value.as_ref();
        match counts.get_mut(value) {
            Some(count) => *count += 1,
            None => {
                counts.insert(value.to_string(), 1);
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // stable: ties stay in encounter order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(k);
    ranked.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_by_count() {
        let table = top_k(["b", "a", "a", "c", "a", "b"], 10);
        let entries: Vec<_> = table.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(entries, vec![("a", 3), ("b", 2), ("c", 1)]);
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let table = top_k(["z", "y", "x", "y", "z", "x"], 10);
        let keys: Vec<_> = table.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_truncates_to_k() {
        let table = top_k(["a", "b", "c", "d"], 2);
        let keys: Vec<_> = table.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_deterministic_serialization() {
        let input = ["q", "w", "e", "w", "q", "r", "t", "e"];
        let first = serde_json::to_string(&top_k(input, 3)).unwrap();
        let second = serde_json::to_string(&top_k(input, 3)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, r#"{"q":2,"w":2,"e":2}"#);
    }

    #[test]
    fn test_empty_input() {
        assert!(top_k(Vec::<String>::new(), 5).is_empty());
    }
}
