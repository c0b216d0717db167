use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

/// A selectable autocomplete option supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub value: String,
    pub text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Candidate {
    pub fn new(value: impl Into<String>, text: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// True if any keyword starts with `query`.
    pub fn matches(&self, query: &str, match_case: bool) -> bool {
        if match_case {
            self.keywords.iter().any(|k| k.starts_with(query))
        } else {
            let query = query.to_lowercase();
            self.keywords
                .iter()
                .any(|k| k.to_lowercase().starts_with(&query))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    pub match_case: bool,
    /// Upper bound on returned candidates; the tail is dropped.
    pub max_results: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            match_case: true,
            max_results: usize::MAX,
        }
    }
}

/// Candidates whose keywords have `query` as a prefix, in input order.
///
/// No active token (`None`) and a bare trigger (`Some("")`) both yield
/// nothing, so the dropdown never opens on "everything".
pub fn filter_candidates<'a>(
    candidates: &'a [Candidate],
    query: Option<&str>,
    options: &FilterOptions,
) -> Vec<&'a Candidate> {
    let _span = debug_span!("filter_candidates", ?query, total = candidates.len()).entered();

    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return Vec::new();
    };
    let matched: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.matches(query, options.match_case))
        .take(options.max_results)
        .collect();
    debug!(matched = matched.len());
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> FilterOptions {
        FilterOptions::default()
    }

    fn sample() -> Vec<Candidate> {
        vec![
            Candidate::new("aaa", "aaa", &["aaa"]),
            Candidate::new("rust", "Rust", &["rust", "rustlang"]),
            Candidate::new("ruby", "Ruby", &["ruby", "Rails"]),
            Candidate::new("go", "Go", &["go", "golang"]),
        ]
    }

    fn values<'a>(found: &[&'a Candidate]) -> Vec<&'a str> {
        found.iter().map(|c| c.value.as_str()).collect()
    }

    #[test]
    fn test_empty_inputs() {
        assert!(filter_candidates(&[], Some("x"), &opts()).is_empty());
        assert!(filter_candidates(&sample(), None, &opts()).is_empty());
        assert!(filter_candidates(&sample(), Some(""), &opts()).is_empty());
    }

    #[test]
    fn test_prefix_match() {
        let list = vec![Candidate::new("aaa", "aaa", &["aaa"])];
        assert_eq!(values(&filter_candidates(&list, Some("aa"), &opts())), vec!["aaa"]);
        assert!(filter_candidates(&list, Some("zz"), &opts()).is_empty());
        // Prefix only, never infix
        assert!(filter_candidates(&sample(), Some("lang"), &opts()).is_empty());
    }

    #[test]
    fn test_input_order_preserved() {
        let list = sample();
        let found = filter_candidates(&list, Some("r"), &opts());
        assert_eq!(values(&found), vec!["rust", "ruby"]);
    }

    #[test]
    fn test_any_keyword_matches() {
        let list = sample();
        let found = filter_candidates(&list, Some("gol"), &opts());
        assert_eq!(values(&found), vec!["go"]);
    }

    #[test]
    fn test_case_sensitivity() {
        let list = sample();
        // Only ruby has "Rails"
        assert_eq!(values(&filter_candidates(&list, Some("Ra"), &opts())), vec!["ruby"]);
        assert!(filter_candidates(&list, Some("RU"), &opts()).is_empty());

        let insensitive = FilterOptions {
            match_case: false,
            ..opts()
        };
        assert_eq!(
            values(&filter_candidates(&list, Some("RU"), &insensitive)),
            vec!["rust", "ruby"]
        );
    }

    #[test]
    fn test_max_results_truncates_tail() {
        let capped = FilterOptions {
            max_results: 1,
            ..opts()
        };
        assert_eq!(values(&filter_candidates(&sample(), Some("r"), &capped)), vec!["rust"]);
    }

    #[test]
    fn test_code_point_prefix() {
        let list = vec![Candidate::new("tokyo", "東京", &["東京都", "とうきょう"])];
        assert_eq!(values(&filter_candidates(&list, Some("東"), &opts())), vec!["tokyo"]);
        assert_eq!(values(&filter_candidates(&list, Some("とう"), &opts())), vec!["tokyo"]);
    }

    #[test]
    fn test_candidate_json() {
        let list: Vec<Candidate> =
            serde_json::from_str(r#"[{"value": "aaa", "text": "aaa", "keywords": ["aaa"]},
                                     {"value": "b", "text": "B"}]"#)
                .unwrap();
        assert_eq!(list[0].keywords, vec!["aaa"]);
        assert!(list[1].keywords.is_empty());
    }
}
