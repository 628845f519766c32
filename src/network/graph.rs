use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Musician,
    School,
    Orchestra,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Musician => "musician",
            Self::School => "school",
            Self::Orchestra => "orchestra",
        }
    }

    pub fn is_organization(self) -> bool {
        matches!(self, Self::School | Self::Orchestra)
    }
}

#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    /// Empty for schools and orchestras.
    pub instruments: Vec<String>,
}

impl NodeRecord {
    pub fn plays(&self, instrument: &str) -> bool {
        self.instruments.iter().any(|value| value == instrument)
    }
}

#[derive(Clone, Debug)]
pub struct EdgeRecord {
    pub source: usize,
    pub target: usize,
    pub relation: String,
}

impl EdgeRecord {
    pub fn touches(&self, index: usize) -> bool {
        self.source == index || self.target == index
    }
}

/// Connected nodes of one node, grouped by kind and sorted by label.
#[derive(Clone, Debug, Default)]
pub struct Affiliations {
    pub orchestras: Vec<usize>,
    pub schools: Vec<usize>,
    pub musicians: Vec<usize>,
}

/// The immutable network loaded from the data file.
///
/// Edges are unordered; `adjacency` holds every node's one-hop neighbours
/// (deduplicated, sorted by index, self-loops dropped).
#[derive(Clone, Debug)]
pub struct NetworkGraph {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    index_by_id: HashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl NetworkGraph {
    pub(super) fn assemble(
        nodes: Vec<NodeRecord>,
        index_by_id: HashMap<String, usize>,
        edges: Vec<EdgeRecord>,
    ) -> Self {
        let mut adjacency = vec![Vec::new(); nodes.len()];
        for edge in &edges {
            if edge.source == edge.target {
                continue;
            }
            adjacency[edge.source].push(edge.target);
            adjacency[edge.target].push(edge.source);
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        Self {
            nodes,
            edges,
            index_by_id,
            adjacency,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn node(&self, index: usize) -> Option<&NodeRecord> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn neighbors_of(&self, id: &str) -> HashSet<&str> {
        let Some(index) = self.index_of(id) else {
            return HashSet::new();
        };

        self.neighbors(index)
            .iter()
            .map(|&neighbor| self.nodes[neighbor].id.as_str())
            .collect()
    }

    /// Orchestras and schools directly connected to `index`.
    pub fn connected_organizations(
        &self,
        index: usize,
    ) -> impl Iterator<Item = &NodeRecord> + '_ {
        self.neighbors(index)
            .iter()
            .map(|&neighbor| &self.nodes[neighbor])
            .filter(|node| node.kind.is_organization())
    }

    pub fn affiliations(&self, index: usize) -> Affiliations {
        let mut affiliations = Affiliations::default();
        for &neighbor in self.neighbors(index) {
            match self.nodes[neighbor].kind {
                NodeKind::Orchestra => affiliations.orchestras.push(neighbor),
                NodeKind::School => affiliations.schools.push(neighbor),
                NodeKind::Musician => affiliations.musicians.push(neighbor),
            }
        }

        let by_label = |a: &usize, b: &usize| self.nodes[*a].label.cmp(&self.nodes[*b].label);
        affiliations.orchestras.sort_by(by_label);
        affiliations.schools.sort_by(by_label);
        affiliations.musicians.sort_by(by_label);
        affiliations
    }

    pub fn unique_instruments(&self) -> BTreeSet<&str> {
        self.nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Musician)
            .flat_map(|node| node.instruments.iter())
            .filter(|value| !value.is_empty())
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::fixtures::sample;

    #[test]
    fn adjacency_is_symmetric() {
        let graph = sample();
        let m = graph.index_of("m").unwrap();
        let o = graph.index_of("o").unwrap();

        assert!(graph.neighbors(m).contains(&o));
        assert!(graph.neighbors(o).contains(&m));
    }

    #[test]
    fn neighbors_of_returns_ids() {
        let graph = sample();
        let neighbors = graph.neighbors_of("m");

        assert_eq!(neighbors, HashSet::from(["o", "s"]));
        assert!(graph.neighbors_of("missing").is_empty());
    }

    #[test]
    fn affiliations_group_by_kind() {
        let graph = sample();
        let affiliations = graph.affiliations(graph.index_of("m").unwrap());

        assert_eq!(affiliations.orchestras, vec![graph.index_of("o").unwrap()]);
        assert_eq!(affiliations.schools, vec![graph.index_of("s").unwrap()]);
        assert!(affiliations.musicians.is_empty());
    }

    #[test]
    fn unique_instruments_are_sorted_and_distinct() {
        let graph = sample();
        let instruments = graph.unique_instruments().into_iter().collect::<Vec<_>>();

        assert_eq!(instruments, vec!["cello", "violin"]);
    }
}
