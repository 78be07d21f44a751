//! Keyword-based priority selection for the publish stage.
//!
//! Every unprocessed summary is scanned for every keyword on each run, so
//! selection is O(items x keywords). That is acceptable: the processed set
//! only grows, so the unprocessed tail is the only repeated work.

/// Ranks candidates by case-insensitive keyword occurrence counts.
pub struct KeywordSelector {
    keywords: Vec<String>,
}

impl KeywordSelector {
    /// Build a selector; keywords are lowercased once up front.
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Total non-overlapping occurrences of all keywords in `text`,
    /// case-insensitive.
    pub fn score(&self, text: &str) -> usize {
        if self.keywords.is_empty() {
            return 0;
        }

        let text = text.to_lowercase();
        self.keywords
            .iter()
            .map(|kw| text.matches(kw.as_str()).count())
            .sum()
    }

    /// Return the top `n` candidates by descending score, keeping the
    /// original order among equal scores. Zero-score candidates fill the
    /// tail, so the result always has exactly `min(n, items.len())` entries.
    pub fn select<T>(&self, items: Vec<T>, n: usize, text_of: impl Fn(&T) -> &str) -> Vec<T> {
        let mut scored: Vec<(usize, usize, T)> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (self.score(text_of(&item)), index, item))
            .collect();

        // Descending score, then original enumeration order.
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.truncate(n);

        scored.into_iter().map(|(_, _, item)| item).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(selected: Vec<(&'a str, &'a str)>) -> Vec<&'a str> {
        selected.into_iter().map(|(name, _)| name).collect()
    }

    #[test]
    fn test_top_n_by_score() {
        let selector = KeywordSelector::new(["diffusion"]);
        let items = vec![
            ("a", "diffusion models and diffusion again"),
            ("b", "nothing relevant here"),
            ("c", "one diffusion mention"),
        ];

        let selected = selector.select(items, 2, |(_, text)| text);
        assert_eq!(names(selected), vec!["a", "c"]);
    }

    #[test]
    fn test_n_larger_than_corpus_returns_all_in_order() {
        let selector = KeywordSelector::new(["diffusion"]);
        let items = vec![("a", "no match"), ("b", "no match"), ("c", "no match")];

        let selected = selector.select(items, 5, |(_, text)| text);
        assert_eq!(names(selected), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_zero_score_items_fill_the_tail() {
        let selector = KeywordSelector::new(["rare"]);
        let items = vec![("a", "nothing"), ("b", "rare topic"), ("c", "nothing")];

        let selected = selector.select(items, 2, |(_, text)| text);
        assert_eq!(names(selected), vec!["b", "a"]);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let selector = KeywordSelector::new(["x"]);
        let items = vec![("a", "x"), ("b", "x"), ("c", "x x")];

        let selected = selector.select(items, 3, |(_, text)| text);
        assert_eq!(names(selected), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_score_is_case_insensitive_and_summed() {
        let selector = KeywordSelector::new(["Attention", "scaling"]);
        assert_eq!(selector.score("ATTENTION to Scaling laws of attention"), 3);
    }

    #[test]
    fn test_empty_keyword_list_scores_zero() {
        let selector = KeywordSelector::new(Vec::<String>::new());
        assert_eq!(selector.score("anything"), 0);

        // Selection then degrades to original order.
        let items = vec![("a", "z"), ("b", "z")];
        assert_eq!(names(selector.select(items, 1, |(_, t)| t)), vec!["a"]);
    }
}
