use std::collections::BTreeMap;

use crate::network::{NetworkGraph, NodeKind};

use super::{PredicateKind, PredicateSet};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterOption {
    pub kind: PredicateKind,
    pub value: String,
}

/// Distinct filterable values containing `text` (case-insensitive).
///
/// Instrument names win over organization labels when the same string is
/// both, then orchestras over schools. Values already active in `predicates`
/// are skipped. An empty `text` lists everything.
pub fn filter_options(
    graph: &NetworkGraph,
    predicates: &PredicateSet,
    text: &str,
) -> Vec<FilterOption> {
    let needle = text.trim().to_lowercase();
    let mut by_value: BTreeMap<&str, PredicateKind> = BTreeMap::new();

    for instrument in graph.unique_instruments() {
        by_value.insert(instrument, PredicateKind::Instrument);
    }
    for node in graph.nodes() {
        let kind = match node.kind {
            NodeKind::Orchestra => PredicateKind::Orchestra,
            NodeKind::School => PredicateKind::School,
            NodeKind::Musician => continue,
        };
        by_value
            .entry(node.label.as_str())
            .and_modify(|existing| {
                if *existing == PredicateKind::School && kind == PredicateKind::Orchestra {
                    *existing = kind;
                }
            })
            .or_insert(kind);
    }

    by_value
        .into_iter()
        .filter(|(value, _)| needle.is_empty() || value.to_lowercase().contains(&needle))
        .filter(|(value, kind)| !predicates.contains(*kind, value))
        .map(|(value, kind)| FilterOption {
            kind,
            value: value.to_owned(),
        })
        .collect()
}

/// Criteria that rebuild the network around one node.
///
/// An organization yields a single predicate naming it; a musician yields one
/// predicate per connected orchestra and school.
pub fn pivot_predicates(graph: &NetworkGraph, index: usize) -> Vec<(PredicateKind, String)> {
    let Some(node) = graph.node(index) else {
        return Vec::new();
    };

    match node.kind {
        NodeKind::Orchestra => vec![(PredicateKind::Orchestra, node.label.clone())],
        NodeKind::School => vec![(PredicateKind::School, node.label.clone())],
        NodeKind::Musician => {
            let mut predicates = graph
                .connected_organizations(index)
                .map(|organization| {
                    let kind = if organization.kind == NodeKind::Orchestra {
                        PredicateKind::Orchestra
                    } else {
                        PredicateKind::School
                    };
                    (kind, organization.label.clone())
                })
                .collect::<Vec<_>>();
            predicates.sort_by(|a, b| a.1.cmp(&b.1));
            predicates.dedup();
            predicates
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::fixtures::{ensemble, sample};

    #[test]
    fn options_match_substrings_case_insensitively() {
        let graph = ensemble();
        let options = filter_options(&graph, &PredicateSet::default(), "SYMPH");

        let values = options.iter().map(|o| o.value.as_str()).collect::<Vec<_>>();
        assert_eq!(
            values,
            vec!["Boston Symphony Orchestra", "Chicago Symphony Orchestra"]
        );
        assert!(options.iter().all(|o| o.kind == PredicateKind::Orchestra));
    }

    #[test]
    fn options_tag_instruments_and_schools() {
        let graph = ensemble();
        let options = filter_options(&graph, &PredicateSet::default(), "");

        assert!(options.contains(&FilterOption {
            kind: PredicateKind::Instrument,
            value: "viola".to_owned(),
        }));
        assert!(options.contains(&FilterOption {
            kind: PredicateKind::School,
            value: "Juilliard".to_owned(),
        }));
    }

    #[test]
    fn active_values_are_not_offered_again() {
        let graph = ensemble();
        let mut predicates = PredicateSet::default();
        predicates.add(PredicateKind::Instrument, "violin");

        let options = filter_options(&graph, &predicates, "vio");
        let values = options.iter().map(|o| o.value.as_str()).collect::<Vec<_>>();
        assert_eq!(values, vec!["viola"]);
    }

    #[test]
    fn pivot_on_musician_names_its_organizations() {
        let graph = sample();
        let pivot = pivot_predicates(&graph, graph.index_of("m").unwrap());

        assert_eq!(
            pivot,
            vec![
                (PredicateKind::Orchestra, "Chicago Symphony Orchestra".to_owned()),
                (PredicateKind::School, "Northwestern University".to_owned()),
            ]
        );
    }

    #[test]
    fn pivot_on_organization_names_itself() {
        let graph = sample();
        let pivot = pivot_predicates(&graph, graph.index_of("j").unwrap());
        assert_eq!(pivot, vec![(PredicateKind::School, "Juilliard".to_owned())]);
    }
}
