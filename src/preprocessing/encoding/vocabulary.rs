use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::CategoryOrder;

/// Category to code mapping learned for one column.
///
/// Codes are dense in `[0, len)`. Only the ordered category list is
/// serialized; the lookup index is rebuilt on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    categories: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Learn the distinct values of `values` in the requested order.
    pub fn learn(values: &[String], order: CategoryOrder) -> Self {
        let categories: Vec<String> = match order {
            CategoryOrder::Sorted => values
                .iter()
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            CategoryOrder::FirstSeen => {
                let mut seen = HashSet::new();
                values
                    .iter()
                    .filter(|v| seen.insert(v.as_str()))
                    .cloned()
                    .collect()
            }
        };
        Self::from(categories)
    }

    pub fn code(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(categories: Vec<String>) -> Self {
        let index = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self { categories, index }
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sorted_order() {
        let vocab = Vocabulary::learn(&strings(&["b", "a", "c", "a"]), CategoryOrder::Sorted);
        assert_eq!(vocab.categories(), &["a", "b", "c"]);
        assert_eq!(vocab.code("a"), Some(0));
        assert_eq!(vocab.code("c"), Some(2));
        assert_eq!(vocab.code("z"), None);
    }

    #[test]
    fn test_first_seen_order() {
        let vocab = Vocabulary::learn(&strings(&["b", "a", "b", "c"]), CategoryOrder::FirstSeen);
        assert_eq!(vocab.categories(), &["b", "a", "c"]);
        assert_eq!(vocab.code("b"), Some(0));
    }

    #[test]
    fn test_serde_rebuilds_index() {
        let vocab = Vocabulary::learn(&strings(&["Male", "Female"]), CategoryOrder::Sorted);
        let json = serde_json::to_string(&vocab).unwrap();
        assert_eq!(json, r#"["Female","Male"]"#);
        let restored: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.code("Male"), Some(1));
    }
}
