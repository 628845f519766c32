use tracing::debug;

use crate::network::{NetworkGraph, NodeKind, NodeRecord};

use super::{Combinator, PredicateKind, PredicateSet};

/// Subgraphs with more nodes than this are not mounted on the canvas.
pub const OVERSIZE_NODE_LIMIT: usize = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubgraphStatus {
    Normal,
    /// Predicates are active and nothing matched.
    Empty,
    /// More than [`OVERSIZE_NODE_LIMIT`] nodes matched.
    Oversize,
}

/// Nodes selected by a predicate set, closed under "both endpoints retained".
#[derive(Clone, Debug)]
pub struct Subgraph {
    nodes: Vec<usize>,
    edges: Vec<usize>,
    membership: Vec<bool>,
    status: SubgraphStatus,
}

impl Subgraph {
    fn from_membership(graph: &NetworkGraph, membership: Vec<bool>, filtered: bool) -> Self {
        let nodes = membership
            .iter()
            .enumerate()
            .filter_map(|(index, retained)| retained.then_some(index))
            .collect::<Vec<_>>();
        let edges = graph
            .edges()
            .iter()
            .enumerate()
            .filter(|(_, edge)| membership[edge.source] && membership[edge.target])
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        let status = if filtered && nodes.is_empty() {
            SubgraphStatus::Empty
        } else if nodes.len() > OVERSIZE_NODE_LIMIT {
            SubgraphStatus::Oversize
        } else {
            SubgraphStatus::Normal
        };

        Self {
            nodes,
            edges,
            membership,
            status,
        }
    }

    /// Retained node indices in ascending order.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Indices into [`NetworkGraph::edges`] of the retained edges.
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    pub fn contains(&self, index: usize) -> bool {
        self.membership.get(index).copied().unwrap_or(false)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn status(&self) -> SubgraphStatus {
        self.status
    }
}

struct Criteria<'a> {
    instruments: Vec<&'a str>,
    orchestras: Vec<&'a str>,
    schools: Vec<&'a str>,
}

impl<'a> Criteria<'a> {
    fn from_predicates(predicates: &'a PredicateSet) -> Self {
        Self {
            instruments: predicates.values_of(PredicateKind::Instrument).collect(),
            orchestras: predicates.values_of(PredicateKind::Orchestra).collect(),
            schools: predicates.values_of(PredicateKind::School).collect(),
        }
    }

    /// Organization labels named by either organization kind.
    fn organization_labels(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.orchestras.iter().chain(&self.schools).copied()
    }

    /// Direct retention of an organization node in OR mode checks its kind.
    fn names_organization(&self, node: &NodeRecord) -> bool {
        match node.kind {
            NodeKind::Orchestra => self.orchestras.contains(&node.label.as_str()),
            NodeKind::School => self.schools.contains(&node.label.as_str()),
            NodeKind::Musician => false,
        }
    }
}

/// Connectivity compares labels only, whatever kind the organization is.
fn connected_to(graph: &NetworkGraph, index: usize, label: &str) -> bool {
    graph
        .connected_organizations(index)
        .any(|organization| organization.label == label)
}

fn musician_matches_all(graph: &NetworkGraph, index: usize, criteria: &Criteria<'_>) -> bool {
    let node = &graph.nodes()[index];
    criteria.instruments.iter().all(|value| node.plays(value))
        && criteria
            .organization_labels()
            .all(|label| connected_to(graph, index, label))
}

fn musician_matches_any(graph: &NetworkGraph, index: usize, criteria: &Criteria<'_>) -> bool {
    let node = &graph.nodes()[index];
    criteria.instruments.iter().any(|value| node.plays(value))
        || criteria
            .organization_labels()
            .any(|label| connected_to(graph, index, label))
}

/// Derives the induced subgraph for `predicates`.
///
/// Musicians are matched per the combinator; organizations enter through a
/// retained neighbour, or, in OR mode only, by their own label.
pub fn resolve_subgraph(graph: &NetworkGraph, predicates: &PredicateSet) -> Subgraph {
    let node_count = graph.node_count();
    if predicates.is_empty() {
        return Subgraph::from_membership(graph, vec![true; node_count], false);
    }

    let criteria = Criteria::from_predicates(predicates);
    let combinator = predicates.combinator();

    let seeds = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| match (node.kind, combinator) {
            (NodeKind::Musician, Combinator::And) => musician_matches_all(graph, index, &criteria),
            (NodeKind::Musician, Combinator::Or) => musician_matches_any(graph, index, &criteria),
            (_, Combinator::And) => false,
            (_, Combinator::Or) => criteria.names_organization(node),
        })
        .collect::<Vec<_>>();

    let mut membership = seeds.clone();
    for (index, _) in seeds.iter().enumerate().filter(|(_, seeded)| **seeded) {
        for &neighbor in graph.neighbors(index) {
            if graph.nodes()[neighbor].kind.is_organization() {
                membership[neighbor] = true;
            }
        }
    }

    let subgraph = Subgraph::from_membership(graph, membership, true);
    debug!(
        predicates = predicates.len(),
        combinator = combinator.label(),
        nodes = subgraph.node_count(),
        edges = subgraph.edge_count(),
        status = ?subgraph.status(),
        "subgraph resolved"
    );
    subgraph
}
