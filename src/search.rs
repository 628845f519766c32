use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::network::NetworkGraph;

pub const MAX_SEARCH_RESULTS: usize = 5;
const MIN_SCORE_PER_QUERY_CHAR: i64 = 8;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Fuzzy index over node labels, built once per loaded network.
pub struct SearchIndex {
    matcher: SkimMatcherV2,
    labels: Vec<(usize, String)>,
}

impl SearchIndex {
    pub fn new(graph: &NetworkGraph) -> Self {
        let labels = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| (index, node.label.clone()))
            .collect();

        Self {
            matcher: SkimMatcherV2::default(),
            labels,
        }
    }

    /// Up to [`MAX_SEARCH_RESULTS`] node indices, best match first.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let threshold = query.chars().count() as i64 * MIN_SCORE_PER_QUERY_CHAR;
        let mut ranked = self
            .labels
            .iter()
            .filter_map(|(index, label)| {
                fuzzy_match_score(&self.matcher, label, query)
                    .filter(|score| *score >= threshold)
                    .map(|score| (score, label.as_str(), *index))
            })
            .collect::<Vec<_>>();

        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        ranked.truncate(MAX_SEARCH_RESULTS);
        ranked.into_iter().map(|(_, _, index)| index).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::parse_network;

    fn people(labels: &[&str]) -> NetworkGraph {
        let nodes = labels
            .iter()
            .enumerate()
            .map(|(i, label)| serde_json::json!({"id": format!("n{i}"), "label": label, "type": "musician"}))
            .collect::<Vec<_>>();
        parse_network(&serde_json::json!({ "nodes": nodes, "edges": [] }).to_string()).unwrap()
    }

    #[test]
    fn closer_label_ranks_first() {
        let graph = people(&["Jan Doe", "Jane Smith"]);
        let index = SearchIndex::new(&graph);

        let results = index.search("jane");
        let labels = results
            .iter()
            .map(|&i| graph.nodes()[i].label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels.first(), Some(&"Jane Smith"));
        assert!(labels.contains(&"Jan Doe"));
    }

    #[test]
    fn blank_query_returns_nothing() {
        let graph = people(&["Jane Smith"]);
        let index = SearchIndex::new(&graph);

        assert!(index.search("").is_empty());
        assert!(index.search("   ").is_empty());
    }

    #[test]
    fn results_are_capped() {
        let graph = people(&[
            "Anna Berg",
            "Anna Cole",
            "Anna Dietz",
            "Anna Eng",
            "Anna Fox",
            "Anna Gray",
            "Anna Hale",
        ]);
        let index = SearchIndex::new(&graph);

        assert_eq!(index.search("anna").len(), MAX_SEARCH_RESULTS);
    }

    #[test]
    fn unrelated_labels_are_filtered() {
        let graph = people(&["Jane Smith", "Oscar Wu"]);
        let index = SearchIndex::new(&graph);

        let results = index.search("jane");
        assert_eq!(results, vec![graph.index_of("n0").unwrap()]);
    }
}
